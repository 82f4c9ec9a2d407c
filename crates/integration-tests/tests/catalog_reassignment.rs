//! Integration tests for category removal.
//!
//! Products never point at a missing category: removing one moves its
//! products to a fallback, and the last category cannot be removed.

use flipmart_core::{CategoryId, ProductId};
use flipmart_integration_tests::{demo_store, sign_in_operator};
use flipmart_storefront::models::Category;
use flipmart_storefront::services::catalog::{CatalogError, ProductSort};

// =============================================================================
// Reassignment
// =============================================================================

#[tokio::test]
async fn test_removed_category_products_move_to_fallback() {
    let store = demo_store();
    sign_in_operator(&store).await;
    let catalog = store.operator().await.unwrap().catalog();

    let removal = catalog.delete_category(CategoryId::new(2)).await.unwrap();
    assert_eq!(removal.removed.name, "Laptops");
    assert_eq!(removal.fallback, CategoryId::new(1));
    assert_eq!(removal.reassigned, 3);

    let mobiles = catalog
        .products_in_category(CategoryId::new(1), ProductSort::Newest)
        .await;
    assert_eq!(mobiles.len(), 6);
    assert!(mobiles.iter().any(|p| p.id == ProductId::new(202)));

    assert!(catalog.category(CategoryId::new(2)).await.is_err());
    assert_eq!(catalog.products().await.len(), 15);
}

#[tokio::test]
async fn test_removing_first_category_falls_back_to_next() {
    let store = demo_store();
    let catalog = store.catalog();

    let removal = catalog.delete_category(CategoryId::new(1)).await.unwrap();

    assert_eq!(removal.fallback, CategoryId::new(2));
    let product = catalog.product(ProductId::new(101)).await.unwrap();
    assert_eq!(product.category_id, CategoryId::new(2));
}

#[tokio::test]
async fn test_every_product_keeps_a_live_category() {
    let store = demo_store();
    let catalog = store.catalog();

    for id in [3, 5, 7] {
        catalog.delete_category(CategoryId::new(id)).await.unwrap();
    }

    let categories = catalog.categories().await;
    for product in catalog.products().await {
        assert!(
            categories.iter().any(|c| c.id == product.category_id),
            "product {} points at a missing category",
            product.id
        );
    }
}

// =============================================================================
// Last Category
// =============================================================================

#[tokio::test]
async fn test_last_category_cannot_be_removed() {
    let store = demo_store();
    let catalog = store.catalog();

    for id in 2..=7 {
        catalog.delete_category(CategoryId::new(id)).await.unwrap();
    }

    let err = catalog
        .delete_category(CategoryId::new(1))
        .await
        .unwrap_err();
    assert_eq!(err, CatalogError::LastCategoryViolation);

    assert_eq!(catalog.categories().await.len(), 1);
    let products = catalog
        .products_in_category(CategoryId::new(1), ProductSort::Newest)
        .await;
    assert_eq!(products.len(), 15);
}

#[tokio::test]
async fn test_new_category_can_replace_the_last_one() {
    let store = demo_store();
    let catalog = store.catalog();
    for id in 2..=7 {
        catalog.delete_category(CategoryId::new(id)).await.unwrap();
    }

    let id = catalog.next_category_id().await;
    catalog
        .add_category(Category {
            id,
            name: "Everything".to_string(),
            image: String::new(),
            is_featured: true,
        })
        .await
        .unwrap();

    let removal = catalog.delete_category(CategoryId::new(1)).await.unwrap();
    assert_eq!(removal.fallback, id);
    assert_eq!(removal.reassigned, 15);
}
