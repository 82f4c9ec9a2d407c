//! Catalog store.
//!
//! Owns categories and products. The only cross-entity rule is category
//! removal: every product of the removed category moves to a fallback
//! category first, and the last category can never be removed.

mod error;

pub use error::CatalogError;

use core::str::FromStr;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use flipmart_core::{CategoryId, ProductId};

use crate::error::{Entity, NotFoundError};
use crate::models::{Category, Product};
use crate::state::Store;

/// Maximum products returned by [`CatalogStore::search`].
pub const SEARCH_PRODUCT_LIMIT: usize = 5;

/// Maximum categories returned by [`CatalogStore::search`].
pub const SEARCH_CATEGORY_LIMIT: usize = 3;

/// Ordering for category listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Catalog order.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "newest" => Ok(Self::Newest),
            "priceasc" | "pricelowtohigh" => Ok(Self::PriceAsc),
            "pricedesc" | "pricehightolow" => Ok(Self::PriceDesc),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

/// Quick-search hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

impl SearchResults {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.categories.is_empty()
    }
}

/// Outcome of removing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRemoval {
    pub removed: Category,
    /// Category that inherited the removed category's products.
    pub fallback: CategoryId,
    /// Number of products moved to `fallback`.
    pub reassigned: usize,
}

/// Catalog service.
pub struct CatalogStore<'a> {
    store: &'a Store,
}

impl<'a> CatalogStore<'a> {
    /// Create a catalog service over `store`.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn categories(&self) -> Vec<Category> {
        self.store.data().catalog.read().await.categories.clone()
    }

    /// Look up one category.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if no category has that ID.
    pub async fn category(&self, id: CategoryId) -> Result<Category, NotFoundError> {
        self.store
            .data()
            .catalog
            .read()
            .await
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| NotFoundError::new(Entity::Category, &id))
    }

    /// Categories flagged for the home page.
    pub async fn featured_categories(&self) -> Vec<Category> {
        self.store
            .data()
            .catalog
            .read()
            .await
            .categories
            .iter()
            .filter(|c| c.is_featured)
            .cloned()
            .collect()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.store.data().catalog.read().await.products.clone()
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if no product has that ID.
    pub async fn product(&self, id: ProductId) -> Result<Product, NotFoundError> {
        self.store
            .data()
            .catalog
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| NotFoundError::new(Entity::Product, &id))
    }

    /// Products of one category in the requested order.
    ///
    /// An unknown category yields an empty list.
    pub async fn products_in_category(&self, id: CategoryId, sort: ProductSort) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .store
            .data()
            .catalog
            .read()
            .await
            .products
            .iter()
            .filter(|p| p.category_id == id)
            .cloned()
            .collect();

        match sort {
            ProductSort::Newest => {}
            ProductSort::PriceAsc => products.sort_by_key(|p| p.price),
            ProductSort::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        products
    }

    /// Case-insensitive substring search.
    ///
    /// Products match on name or description, categories on name. A blank
    /// term matches nothing.
    pub async fn search(&self, term: &str) -> SearchResults {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return SearchResults::default();
        }

        let catalog = self.store.data().catalog.read().await;
        let results = SearchResults {
            products: catalog
                .products
                .iter()
                .filter(|p| {
                    p.name.to_lowercase().contains(&needle)
                        || p.description.to_lowercase().contains(&needle)
                })
                .take(SEARCH_PRODUCT_LIMIT)
                .cloned()
                .collect(),
            categories: catalog
                .categories
                .iter()
                .filter(|c| c.name.to_lowercase().contains(&needle))
                .take(SEARCH_CATEGORY_LIMIT)
                .cloned()
                .collect(),
        };

        debug!(
            term = %needle,
            products = results.products.len(),
            categories = results.categories.len(),
            "Catalog search"
        );
        results
    }

    /// One past the highest category ID in use.
    pub async fn next_category_id(&self) -> CategoryId {
        let catalog = self.store.data().catalog.read().await;
        let max = catalog
            .categories
            .iter()
            .map(|c| c.id.as_i64())
            .max()
            .unwrap_or(0);
        CategoryId::new(max.saturating_add(1))
    }

    /// One past the highest product ID in use.
    pub async fn next_product_id(&self) -> ProductId {
        let catalog = self.store.data().catalog.read().await;
        let max = catalog
            .products
            .iter()
            .map(|p| p.id.as_i64())
            .max()
            .unwrap_or(0);
        ProductId::new(max.saturating_add(1))
    }

    // =========================================================================
    // Category edits
    // =========================================================================

    /// Insert a new category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingField` for a blank name and
    /// `CatalogError::DuplicateId` if the ID is taken.
    #[instrument(skip(self, category), fields(category_id = %category.id))]
    pub async fn add_category(&self, category: Category) -> Result<Category, CatalogError> {
        require(&category.name, "category name")?;
        self.store.simulate_latency().await;

        let mut catalog = self.store.data().catalog.write().await;
        if catalog.categories.iter().any(|c| c.id == category.id) {
            return Err(CatalogError::DuplicateId {
                entity: Entity::Category,
                id: category.id.to_string(),
            });
        }
        catalog.categories.push(category.clone());

        info!(name = %category.name, "Category added");
        Ok(category)
    }

    /// Replace the stored category with the same ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingField` for a blank name and
    /// `CatalogError::NotFound` if the ID is unknown.
    #[instrument(skip(self, category), fields(category_id = %category.id))]
    pub async fn update_category(&self, category: Category) -> Result<(), CatalogError> {
        require(&category.name, "category name")?;
        self.store.simulate_latency().await;

        let mut catalog = self.store.data().catalog.write().await;
        let stored = catalog
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| NotFoundError::new(Entity::Category, &category.id))?;
        *stored = category;

        info!("Category updated");
        Ok(())
    }

    /// Remove a category, moving its products to another category first.
    ///
    /// The fallback is the first remaining category in catalog order.
    /// Reassignment and removal commit under one lock, so no reader ever
    /// sees a product pointing at a missing category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the ID is unknown and
    /// `CatalogError::LastCategoryViolation` if it is the only category.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<CategoryRemoval, CatalogError> {
        self.store.simulate_latency().await;

        let mut catalog = self.store.data().catalog.write().await;
        let index = catalog
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| NotFoundError::new(Entity::Category, &id))?;

        let Some(fallback) = catalog
            .categories
            .iter()
            .map(|c| c.id)
            .find(|other| *other != id)
        else {
            warn!("Refused to delete the last category");
            return Err(CatalogError::LastCategoryViolation);
        };

        let mut reassigned = 0;
        for product in catalog.products.iter_mut().filter(|p| p.category_id == id) {
            product.category_id = fallback;
            reassigned += 1;
        }
        let removed = catalog.categories.remove(index);

        info!(%fallback, reassigned, "Category deleted");
        Ok(CategoryRemoval {
            removed,
            fallback,
            reassigned,
        })
    }

    // =========================================================================
    // Product edits
    // =========================================================================

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingField` for a blank name,
    /// `CatalogError::UnknownCategory` if the category does not exist, and
    /// `CatalogError::DuplicateId` if the ID is taken.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_product(&self, product: Product) -> Result<Product, CatalogError> {
        require(&product.name, "product name")?;
        self.store.simulate_latency().await;

        let mut catalog = self.store.data().catalog.write().await;
        if !catalog.categories.iter().any(|c| c.id == product.category_id) {
            return Err(CatalogError::UnknownCategory(product.category_id));
        }
        if catalog.products.iter().any(|p| p.id == product.id) {
            return Err(CatalogError::DuplicateId {
                entity: Entity::Product,
                id: product.id.to_string(),
            });
        }
        catalog.products.push(product.clone());

        info!(name = %product.name, price = %product.price, "Product added");
        Ok(product)
    }

    /// Replace the stored product with the same ID.
    ///
    /// Existing cart lines and orders keep their snapshots.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingField`, `CatalogError::UnknownCategory`,
    /// or `CatalogError::NotFound`.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn update_product(&self, product: Product) -> Result<(), CatalogError> {
        require(&product.name, "product name")?;
        self.store.simulate_latency().await;

        let mut catalog = self.store.data().catalog.write().await;
        if !catalog.categories.iter().any(|c| c.id == product.category_id) {
            return Err(CatalogError::UnknownCategory(product.category_id));
        }
        let stored = catalog
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| NotFoundError::new(Entity::Product, &product.id))?;
        *stored = product;

        info!("Product updated");
        Ok(())
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the ID is unknown.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store.simulate_latency().await;

        let mut catalog = self.store.data().catalog.write().await;
        let index = catalog
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| NotFoundError::new(Entity::Product, &id))?;
        let removed = catalog.products.remove(index);

        info!("Product deleted");
        Ok(removed)
    }
}

fn require(value: &str, field: &'static str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::MissingField(field));
    }
    Ok(())
}
