//! Integration tests for operator account management.
//!
//! Blocking ends the affected customer's session; removing a customer takes
//! their orders with them and leaves everyone else's untouched.

use flipmart_core::{ProductId, UserId};
use flipmart_integration_tests::{DEMO_SECRET, demo_store, sign_in, sign_in_operator};
use flipmart_storefront::services::accounts::AuthError;

const JANE: &str = "jane.smith@example.com";

// =============================================================================
// Blocking
// =============================================================================

#[tokio::test]
async fn test_blocking_signed_in_customer_ends_session_and_cart() {
    let store = demo_store();
    sign_in(&store, JANE).await;
    let product = store.catalog().product(ProductId::new(103)).await.unwrap();
    store.cart().add_item(&product, 1).await.unwrap();

    store
        .accounts()
        .set_blocked(UserId::new(2), true)
        .await
        .unwrap();

    assert!(store.accounts().current_user().await.is_none());
    assert_eq!(store.cart().count().await, 0);

    let err = store
        .accounts()
        .authenticate(JANE, DEMO_SECRET)
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::Blocked);
}

#[tokio::test]
async fn test_blocking_someone_else_keeps_session() {
    let store = demo_store();
    sign_in(&store, JANE).await;
    let product = store.catalog().product(ProductId::new(103)).await.unwrap();
    store.cart().add_item(&product, 2).await.unwrap();

    store
        .accounts()
        .set_blocked(UserId::new(1), true)
        .await
        .unwrap();

    assert_eq!(
        store.accounts().current_user().await.map(|u| u.id),
        Some(UserId::new(2))
    );
    assert_eq!(store.cart().count().await, 2);
}

#[tokio::test]
async fn test_unblocking_restores_sign_in() {
    let store = demo_store();
    let accounts = store.accounts();
    assert_eq!(
        accounts
            .authenticate("sam.brown@example.com", DEMO_SECRET)
            .await
            .unwrap_err(),
        AuthError::Blocked
    );

    accounts.set_blocked(UserId::new(3), false).await.unwrap();

    let user = accounts
        .authenticate("sam.brown@example.com", DEMO_SECRET)
        .await
        .unwrap();
    assert_eq!(user.id, UserId::new(3));
}

// =============================================================================
// Customer Removal
// =============================================================================

#[tokio::test]
async fn test_remove_customer_takes_their_orders() {
    let store = demo_store();
    sign_in_operator(&store).await;
    let operator = store.operator().await.unwrap();

    let removal = operator.remove_customer(UserId::new(1)).await.unwrap();
    assert_eq!(removal.user.name, "John Doe");
    assert_eq!(removal.orders_removed, 2);

    assert!(store.accounts().user(UserId::new(1)).await.is_err());
    assert!(
        store
            .orders()
            .orders_for_user(UserId::new(1))
            .await
            .is_empty()
    );
    assert_eq!(store.orders().orders_for_user(UserId::new(2)).await.len(), 1);
    assert_eq!(store.orders().orders().await.len(), 2);
}

#[tokio::test]
async fn test_remove_unknown_customer_changes_nothing() {
    let store = demo_store();
    sign_in_operator(&store).await;
    let operator = store.operator().await.unwrap();

    assert!(operator.remove_customer(UserId::new(99)).await.is_err());

    assert_eq!(store.accounts().users().await.len(), 3);
    assert_eq!(store.orders().orders().await.len(), 4);
}

#[tokio::test]
async fn test_dashboard_follows_removal() {
    let store = demo_store();
    sign_in_operator(&store).await;
    let operator = store.operator().await.unwrap();

    let before = operator.dashboard().await;
    assert_eq!(before.total_users, 3);
    assert_eq!(before.total_orders, 4);
    assert_eq!(before.pending_confirmation, 1);

    operator.remove_customer(UserId::new(3)).await.unwrap();

    let after = operator.dashboard().await;
    assert_eq!(after.total_users, 2);
    assert_eq!(after.total_orders, 3);
    assert_eq!(after.pending_confirmation, 0);
}

#[tokio::test]
async fn test_removing_signed_in_customer_ends_session() {
    let store = demo_store();
    sign_in(&store, JANE).await;
    sign_in_operator(&store).await;
    let operator = store.operator().await.unwrap();

    operator.remove_customer(UserId::new(2)).await.unwrap();

    assert!(store.accounts().current_user().await.is_none());
}
