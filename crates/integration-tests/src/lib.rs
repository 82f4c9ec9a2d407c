//! Integration tests for Flipmart.
//!
//! Each test builds its own in-memory store over the demo dataset, so tests
//! are independent and need no external services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p flipmart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - cart to order to operator confirmation
//! - `account_cascade` - blocking and removing customers
//! - `catalog_reassignment` - category removal and product fallback

use flipmart_storefront::Store;

/// Secret shared by every demo user and the demo operator.
pub const DEMO_SECRET: &str = "password";

/// Demo operator username.
pub const OPERATOR: &str = "admin";

/// Fresh store over the demo dataset with no simulated latency.
///
/// # Panics
///
/// Panics if the demo dataset is malformed.
#[must_use]
pub fn demo_store() -> Store {
    Store::demo().expect("demo seed is consistent")
}

/// Sign in a demo customer.
///
/// # Panics
///
/// Panics if the credentials are rejected.
pub async fn sign_in(store: &Store, email: &str) {
    store
        .accounts()
        .authenticate(email, DEMO_SECRET)
        .await
        .expect("demo customer signs in");
}

/// Grant operator privilege to the current session.
///
/// # Panics
///
/// Panics if the demo operator credentials are rejected.
pub async fn sign_in_operator(store: &Store) {
    store
        .accounts()
        .operator_login(OPERATOR, DEMO_SECRET)
        .await
        .expect("demo operator signs in");
}

