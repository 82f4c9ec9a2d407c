//! Scripted customer sessions.
//!
//! # Usage
//!
//! ```bash
//! # Jane buys one laptop and two cases, the operator confirms payment
//! fm-cli simulate checkout --email jane.smith@example.com --secret password \
//!     --item 201:1 --item 104:2 --confirm
//! ```

use tracing::{info, warn};

use flipmart_core::{ProductId, UserId};
use flipmart_storefront::config::StorefrontConfig;
use flipmart_storefront::{AppError, Store};

use super::{CliError, operator_session, parse_id};

/// Inputs for one scripted checkout.
#[derive(Debug, Clone)]
pub struct CheckoutScript {
    pub email: String,
    pub secret: String,
    /// `PRODUCT_ID:QUANTITY` pairs.
    pub items: Vec<String>,
    /// Replaces the address on file when set.
    pub address: Option<String>,
    /// Have the operator confirm payment afterwards.
    pub confirm: bool,
}

/// Sign in, fill the cart, and place an order.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for a malformed item and
/// `CliError::App` for any refused store operation.
pub async fn checkout(
    store: &Store,
    config: &StorefrontConfig,
    script: &CheckoutScript,
) -> Result<(), CliError> {
    let user = store
        .accounts()
        .authenticate(&script.email, &script.secret)
        .await
        .map_err(AppError::from)?;
    info!("Signed in as {} (VIP: {})", user.name, user.is_vip);

    for item in &script.items {
        let (product_id, quantity) = parse_item(item)?;
        let product = store
            .catalog()
            .product(product_id)
            .await
            .map_err(AppError::from)?;
        store
            .cart()
            .add_item(&product, quantity)
            .await
            .map_err(AppError::from)?;
        info!("  + {quantity} x {} @ {}", product.name, product.price.display());
    }

    let summary = store.cart().summary().await;
    info!("Subtotal:     {}", summary.subtotal.display());
    info!("VIP discount: {}", summary.vip_discount.display());
    info!("Total:        {}", summary.total.display());

    let mut details = store.checkout().details().await.map_err(AppError::from)?;
    if let Some(address) = &script.address {
        details.address.clone_from(address);
    }

    let payment = store.checkout().payment().await.map_err(AppError::from)?;
    info!("Pay {} to {}", payment.amount.display(), payment.upi_id);
    info!("  UPI link: {}", payment.upi_link);
    if payment.is_custom_qr {
        info!("  QR: custom image");
    } else {
        info!("  QR: {}", payment.qr_image);
    }

    let order = store
        .checkout()
        .place_order(&details)
        .await
        .map_err(AppError::from)?;
    info!(
        "Order {} placed: {} ({})",
        order.id,
        order.total_amount.display(),
        order.status
    );

    if script.confirm {
        store.accounts().logout().await;
        operator_session(store, config).await?;
        let confirmed = store
            .operator()
            .await
            .map_err(AppError::from)?
            .orders()
            .confirm_payment(&order.id)
            .await
            .map_err(AppError::from)?;
        info!("Order {} is now {}", confirmed.id, confirmed.status);
    } else {
        warn!("Order {} is awaiting operator confirmation", order.id);
    }

    Ok(())
}

/// Log what a customer sees on their orders page.
///
/// # Errors
///
/// Returns `CliError::App` if the user does not exist.
pub async fn customer_orders(store: &Store, user_id: &str) -> Result<(), CliError> {
    let user_id = UserId::new(parse_id(user_id)?);
    let user = store.accounts().user(user_id).await.map_err(AppError::from)?;
    let orders = store.orders().orders_for_user(user_id).await;

    info!("{} has {} orders", user.name, orders.len());
    for order in &orders {
        let stage = order
            .status
            .stage_index()
            .map_or_else(|| "-".to_string(), |i| format!("{}/4", i + 1));
        info!(
            "  {}  {:<22} stage {stage}  {}",
            order.id,
            order.status.label(),
            order.total_amount.display()
        );
    }
    Ok(())
}

fn parse_item(value: &str) -> Result<(ProductId, u32), CliError> {
    let invalid = || CliError::InvalidArgument(format!("expected PRODUCT_ID:QUANTITY, got {value}"));
    let (id, quantity) = value.split_once(':').ok_or_else(invalid)?;
    let quantity: u32 = quantity.trim().parse().map_err(|_| invalid())?;
    if quantity == 0 {
        return Err(invalid());
    }
    Ok((ProductId::new(parse_id(id)?), quantity))
}
