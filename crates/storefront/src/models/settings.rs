//! Operator-editable payment settings.

use serde::{Deserialize, Serialize};

/// Settings read by checkout to display payment instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettings {
    /// UPI payee identifier, e.g. `store@oksbi`.
    pub upi_id: String,
    /// Operator-uploaded QR image; replaces the generated one when set.
    pub custom_qr_image: Option<String>,
}

impl PaymentSettings {
    #[must_use]
    pub fn new(upi_id: impl Into<String>) -> Self {
        Self {
            upi_id: upi_id.into(),
            custom_qr_image: None,
        }
    }
}
