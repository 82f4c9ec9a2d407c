//! Operator order tooling.
//!
//! Each run signs in with the configured operator credentials
//! (`FLIPMART_OPERATOR_USERNAME` / `FLIPMART_OPERATOR_SECRET`).
//!
//! # Usage
//!
//! ```bash
//! fm-cli orders list --view pending
//! fm-cli orders confirm OD333333333
//! fm-cli orders advance OD555555555 delivered
//! fm-cli orders dashboard
//! ```

use tracing::info;

use flipmart_core::{OrderId, OrderStatus, OrderView, UserId};
use flipmart_storefront::config::StorefrontConfig;
use flipmart_storefront::models::Order;
use flipmart_storefront::{AppError, Store};

use super::{CliError, operator_session};

/// An operator action on one order.
#[derive(Debug, Clone)]
pub enum Transition {
    Confirm,
    Reject,
    Advance(String),
    Cancel,
    Delete,
}

/// List orders in an operator tab.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for an unknown view and
/// `CliError::App` if operator sign-in fails.
pub async fn list(store: &Store, config: &StorefrontConfig, view: &str) -> Result<(), CliError> {
    let view: OrderView = view.parse().map_err(CliError::InvalidArgument)?;
    operator_session(store, config).await?;

    let operator = store.operator().await.map_err(AppError::from)?;
    let orders = operator.orders().orders_in_view(view).await;

    info!("{} orders in {view:?}", orders.len());
    for order in &orders {
        log_order(order);
    }
    Ok(())
}

/// Apply one operator transition and log the result.
///
/// # Errors
///
/// Returns `CliError::App` if the order is unknown or the transition is not
/// permitted from its current status.
pub async fn transition(
    store: &Store,
    config: &StorefrontConfig,
    order_id: &str,
    action: Transition,
) -> Result<(), CliError> {
    operator_session(store, config).await?;
    let operator = store.operator().await.map_err(AppError::from)?;
    let orders = operator.orders();
    let id = OrderId::from(order_id.trim());

    let order = match action {
        Transition::Confirm => orders.confirm_payment(&id).await,
        Transition::Reject => orders.reject_payment(&id).await,
        Transition::Cancel => orders.cancel(&id).await,
        Transition::Advance(status) => {
            let status: OrderStatus = status.parse().map_err(CliError::InvalidArgument)?;
            orders.advance(&id, status).await
        }
        Transition::Delete => {
            let removed = orders.delete_order(&id).await.map_err(AppError::from)?;
            info!(order_id = %removed.id, "Order deleted");
            return Ok(());
        }
    }
    .map_err(AppError::from)?;

    log_order(&order);
    Ok(())
}

/// Remove a customer and all of their orders.
///
/// # Errors
///
/// Returns `CliError::App` if the user does not exist.
pub async fn remove_customer(
    store: &Store,
    config: &StorefrontConfig,
    user_id: i64,
) -> Result<(), CliError> {
    operator_session(store, config).await?;
    let operator = store.operator().await.map_err(AppError::from)?;

    let removal = operator
        .remove_customer(UserId::new(user_id))
        .await
        .map_err(AppError::from)?;
    info!(
        "Removed {} ({}) and {} orders",
        removal.user.name, removal.user.email, removal.orders_removed
    );
    Ok(())
}

/// Log dashboard figures.
///
/// # Errors
///
/// Returns `CliError::App` if operator sign-in fails.
pub async fn dashboard(store: &Store, config: &StorefrontConfig) -> Result<(), CliError> {
    operator_session(store, config).await?;
    let stats = store
        .operator()
        .await
        .map_err(AppError::from)?
        .dashboard()
        .await;

    info!("Total revenue:        {}", stats.total_revenue.display_whole());
    info!("Total orders:         {}", stats.total_orders);
    info!("Total products:       {}", stats.total_products);
    info!("Total users:          {}", stats.total_users);
    info!("Pending confirmation: {}", stats.pending_confirmation);
    Ok(())
}

fn log_order(order: &Order) {
    info!(
        "  {:<16} user {:>3}  {:<22} {:>14}  {} units  {}",
        order.id.as_str(),
        order.user_id,
        order.status.to_string(),
        order.total_amount.display(),
        order.unit_count(),
        order.created_at.format("%Y-%m-%d %H:%M")
    );
}
