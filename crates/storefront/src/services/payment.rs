//! UPI payment instructions shown at checkout.
//!
//! Payment is never processed here. Checkout shows a UPI deep link and a
//! scannable image; the operator later confirms or rejects the order by
//! hand.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use flipmart_core::Price;

use crate::models::PaymentSettings;

/// Payee name embedded in the UPI link.
pub const PAYEE_NAME: &str = "Flipmart";

/// Transaction note embedded in the UPI link.
pub const TRANSACTION_NOTE: &str = "OrderPayment";

const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
const QR_SIZE: &str = "200x200";

/// Errors from payment settings edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("UPI ID cannot be empty")]
    EmptyUpiId,

    /// Uploaded file is not an image.
    #[error("unsupported QR image type: {0}")]
    NotAnImage(String),

    #[error("QR image is empty")]
    EmptyImage,

    /// The UPI link could not be built.
    #[error("invalid payment link: {0}")]
    InvalidLink(#[from] url::ParseError),
}

/// What checkout shows for one payable amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentDisplay {
    pub upi_id: String,
    pub amount: Price,
    /// `upi://pay?...` link for UPI apps.
    pub upi_link: String,
    /// Operator-uploaded image if set, otherwise a generated QR code URL.
    pub qr_image: String,
    pub is_custom_qr: bool,
}

impl PaymentDisplay {
    /// Payment instructions for `amount` under the current settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidLink` if the link cannot be built.
    pub fn for_amount(settings: &PaymentSettings, amount: Price) -> Result<Self, SettingsError> {
        let upi_link = upi_link(&settings.upi_id, amount)?;
        let (qr_image, is_custom_qr) = match &settings.custom_qr_image {
            Some(image) => (image.clone(), true),
            None => (generated_qr_url(upi_link.as_str())?.into(), false),
        };

        Ok(Self {
            upi_id: settings.upi_id.clone(),
            amount,
            upi_link: upi_link.into(),
            qr_image,
            is_custom_qr,
        })
    }
}

/// UPI deep link paying `amount` rupees to `upi_id`.
///
/// # Errors
///
/// Returns `SettingsError::InvalidLink` if the link cannot be built.
pub fn upi_link(upi_id: &str, amount: Price) -> Result<Url, SettingsError> {
    let amount = format!("{:.2}", amount.amount());
    let url = Url::parse_with_params(
        "upi://pay",
        &[
            ("pa", upi_id),
            ("pn", PAYEE_NAME),
            ("am", amount.as_str()),
            ("cu", Price::CURRENCY_CODE),
            ("tn", TRANSACTION_NOTE),
        ],
    )?;
    Ok(url)
}

fn generated_qr_url(data: &str) -> Result<Url, SettingsError> {
    let url = Url::parse_with_params(QR_SERVICE_URL, &[("size", QR_SIZE), ("data", data)])?;
    Ok(url)
}

/// Encode an uploaded image as a `data:` URL.
///
/// # Errors
///
/// Returns `SettingsError::NotAnImage` unless `mime` is `image/*` and
/// `SettingsError::EmptyImage` for an empty upload.
pub fn image_data_url(mime: &str, bytes: &[u8]) -> Result<String, SettingsError> {
    let mime = mime.trim().to_ascii_lowercase();
    if !mime.starts_with("image/") || mime.len() == "image/".len() {
        return Err(SettingsError::NotAnImage(mime));
    }
    if bytes.is_empty() {
        return Err(SettingsError::EmptyImage);
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Normalize a UPI ID entered by the operator.
///
/// # Errors
///
/// Returns `SettingsError::EmptyUpiId` for a blank value.
pub fn normalize_upi_id(upi_id: &str) -> Result<String, SettingsError> {
    let trimmed = upi_id.trim();
    if trimmed.is_empty() {
        return Err(SettingsError::EmptyUpiId);
    }
    Ok(trimmed.to_string())
}
