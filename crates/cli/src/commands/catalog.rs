//! Catalog browsing.
//!
//! # Usage
//!
//! ```bash
//! fm-cli catalog categories
//! fm-cli catalog products --category 2 --sort price-asc
//! fm-cli catalog search laptop
//! ```

use tracing::info;

use flipmart_core::CategoryId;
use flipmart_storefront::Store;
use flipmart_storefront::services::catalog::ProductSort;

use super::CliError;

/// List categories, featured ones marked with `*`.
pub async fn categories(store: &Store) {
    let catalog = store.catalog();
    for category in catalog.categories().await {
        let count = catalog
            .products_in_category(category.id, ProductSort::Newest)
            .await
            .len();
        let marker = if category.is_featured { "*" } else { " " };
        info!("{marker} {:>4}  {:<16} {count} products", category.id, category.name);
    }
}

/// List products, optionally limited to one category.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for an unknown sort order.
pub async fn products(store: &Store, category: Option<i64>, sort: &str) -> Result<(), CliError> {
    let sort: ProductSort = sort.parse().map_err(CliError::InvalidArgument)?;
    let catalog = store.catalog();

    let products = match category {
        Some(id) => catalog.products_in_category(CategoryId::new(id), sort).await,
        None => catalog.products().await,
    };

    info!("{} products", products.len());
    for product in products {
        info!(
            "  {:>4}  {:<28} {:>14}  stock {}",
            product.id,
            product.name,
            product.price.display(),
            product.stock
        );
    }
    Ok(())
}

/// Quick search over product and category names.
pub async fn search(store: &Store, term: &str) {
    let results = store.catalog().search(term).await;
    if results.is_empty() {
        info!("No matches for {term:?}");
        return;
    }

    for category in &results.categories {
        info!("  category {:>4}  {}", category.id, category.name);
    }
    for product in &results.products {
        info!(
            "  product  {:>4}  {}  {}",
            product.id,
            product.name,
            product.price.display()
        );
    }
}
