//! Catalog error types.

use thiserror::Error;

use flipmart_core::CategoryId;

use crate::error::{Entity, NotFoundError};

/// Errors that can occur during catalog edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Deleting the only remaining category is refused.
    #[error("cannot delete the last remaining category")]
    LastCategoryViolation,

    /// The referenced category or product does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A record with this ID already exists.
    #[error("{entity} {id} already exists")]
    DuplicateId { entity: Entity, id: String },

    /// A product points at a category that does not exist.
    #[error("category {0} does not exist")]
    UnknownCategory(CategoryId),

    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}
