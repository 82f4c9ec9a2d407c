//! Cart error types.

use thiserror::Error;

use crate::error::NotFoundError;

/// Errors that can occur while editing the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Items are added at a quantity of at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The product is not in the cart.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}
