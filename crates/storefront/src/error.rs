//! Unified error handling.
//!
//! Each service returns its own error enum. `AppError` gathers them for the
//! boundary that invoked the operation, which turns any failure into a
//! user-visible message via [`AppError::user_message`]. No error here is
//! fatal: the store stays usable after every failed operation.

use core::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::seed::SeedError;
use crate::services::accounts::AuthError;
use crate::services::cart::CartError;
use crate::services::catalog::CatalogError;
use crate::services::checkout::CheckoutError;
use crate::services::orders::{OrderError, OrderTransitionError};
use crate::services::payment::SettingsError;

/// Kind of entity an ID refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    User,
    Category,
    Product,
    CartItem,
    Order,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Category => "category",
            Self::Product => "product",
            Self::CartItem => "cart item",
            Self::Order => "order",
        })
    }
}

/// An operation referenced an ID that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// What kind of record was looked up.
    pub entity: Entity,
    /// The missing ID, rendered as text.
    pub id: String,
}

impl NotFoundError {
    /// Build a not-found error for any displayable ID.
    #[must_use]
    pub fn new(entity: Entity, id: &impl ToString) -> Self {
        Self {
            entity,
            id: id.to_string(),
        }
    }
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Sign-in or operator privilege failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog edit refused.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart edit refused.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order operation refused.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Checkout could not complete.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Payment settings rejected.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Seed dataset could not be loaded.
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    /// Environment configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(#[from] NotFoundError),
}

impl From<OrderTransitionError> for AppError {
    fn from(err: OrderTransitionError) -> Self {
        Self::Order(OrderError::from(err))
    }
}

impl AppError {
    /// Message suitable for showing to the person who triggered the operation.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) => err.user_message().to_string(),
            Self::Catalog(CatalogError::LastCategoryViolation) => {
                "At least one category must exist. Create another category before deleting this one."
                    .to_string()
            }
            Self::Order(OrderError::Transition(err)) => err.to_string(),
            Self::Checkout(CheckoutError::AlreadyInFlight) => {
                "Your order is already being submitted. Please wait.".to_string()
            }
            Self::Checkout(CheckoutError::EmptyCart) => "Your cart is empty.".to_string(),
            Self::Checkout(CheckoutError::NoActiveSession) => {
                "Please log in to place an order.".to_string()
            }
            Self::Seed(_) | Self::Config(_) => "The store could not be started.".to_string(),
            Self::NotFound(err) => format!("The requested {} no longer exists.", err.entity),
            Self::Catalog(err) => err.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Order(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Settings(err) => err.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use flipmart_core::{OrderId, OrderStatus};

    use super::*;
    use crate::services::orders::OrderAction;

    #[test]
    fn test_not_found_display() {
        let err = NotFoundError::new(Entity::Product, &101);
        assert_eq!(err.to_string(), "product 101 not found");

        let app: AppError = err.into();
        assert_eq!(app.to_string(), "Not found: product 101 not found");
        assert_eq!(app.user_message(), "The requested product no longer exists.");
    }

    #[test]
    fn test_blocked_message_is_specific() {
        let app = AppError::from(AuthError::Blocked);
        assert!(app.user_message().contains("blocked"));
    }

    #[test]
    fn test_unknown_email_and_bad_secret_share_a_message() {
        assert_eq!(
            AppError::from(AuthError::NotFound).user_message(),
            AppError::from(AuthError::InvalidCredential).user_message()
        );
    }

    #[test]
    fn test_last_category_message() {
        let app = AppError::from(CatalogError::LastCategoryViolation);
        assert!(app.user_message().contains("At least one category"));
    }

    #[test]
    fn test_transition_error_converts() {
        let app = AppError::from(OrderTransitionError::InvalidState {
            order_id: OrderId::from("OD1"),
            status: OrderStatus::Cancelled,
            action: OrderAction::Cancel,
        });
        assert!(matches!(app, AppError::Order(OrderError::Transition(_))));
        assert_eq!(app.user_message(), "cannot cancel order OD1 while it is Cancelled");
    }
}
