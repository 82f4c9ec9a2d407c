//! Catalog types.

use serde::{Deserialize, Serialize};

use flipmart_core::{CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Image URL or data reference.
    pub image: String,
    /// Shown on the home page.
    #[serde(default)]
    pub is_featured: bool,
}

/// A product for sale.
///
/// `price` is non-negative by construction and `stock` by type. Stock is
/// informational: placing an order does not decrement it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    pub image: String,
}
