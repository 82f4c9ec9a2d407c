//! Checkout: turn the active cart into a pending order.
//!
//! Two steps. [`Checkout::details`] prefills shipping details from the
//! signed-in user, then [`Checkout::place_order`] reads the cart total,
//! records the order, and empties the cart in one commit.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::models::{CartSummary, Order};
use crate::services::orders::{OrderError, insert_order};
use crate::services::payment::{PaymentDisplay, SettingsError};
use crate::state::Store;

/// Errors that can occur during checkout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("no user is signed in")]
    NoActiveSession,

    #[error("cart is empty")]
    EmptyCart,

    /// A previous submission has not resolved yet.
    #[error("an order submission is already in progress")]
    AlreadyInFlight,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Payment(#[from] SettingsError),
}

/// Shipping details entered on the first checkout step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl CheckoutDetails {
    fn validate(&self) -> Result<(), CheckoutError> {
        for (value, field) in [
            (&self.name, "name"),
            (&self.phone, "phone"),
            (&self.address, "address"),
        ] {
            if value.trim().is_empty() {
                return Err(CheckoutError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// Held while a submission is in progress; releases the flag on drop.
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmissionGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(Self { flag })
        } else {
            None
        }
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Checkout flow for the active session.
pub struct Checkout<'a> {
    store: &'a Store,
}

impl<'a> Checkout<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Shipping details prefilled from the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NoActiveSession` if nobody is signed in.
    pub async fn details(&self) -> Result<CheckoutDetails, CheckoutError> {
        let session = self.store.data().session.read().await;
        let user = session.user().ok_or(CheckoutError::NoActiveSession)?;
        Ok(CheckoutDetails {
            name: user.name.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
        })
    }

    /// Payment instructions for the current cart total.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart and
    /// `CheckoutError::Payment` if the payment link cannot be built.
    pub async fn payment(&self) -> Result<PaymentDisplay, CheckoutError> {
        let summary = self.store.cart().summary().await;
        if summary.count == 0 {
            return Err(CheckoutError::EmptyCart);
        }
        let settings = self.store.payment_settings().await;
        Ok(PaymentDisplay::for_amount(&settings, summary.total)?)
    }

    /// Record the cart as a pending order and empty the cart.
    ///
    /// The total is read from the cart before it is cleared. Order creation
    /// and clearing commit together under the session lock. A second call
    /// while one is still waiting out the simulated latency is refused.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::AlreadyInFlight`, `CheckoutError::MissingField`,
    /// `CheckoutError::NoActiveSession`, or `CheckoutError::EmptyCart`.
    #[instrument(skip(self, details))]
    pub async fn place_order(&self, details: &CheckoutDetails) -> Result<Order, CheckoutError> {
        let data = self.store.data();
        let Some(_guard) = SubmissionGuard::acquire(&data.checkout_in_flight) else {
            warn!("Checkout refused: submission already in flight");
            return Err(CheckoutError::AlreadyInFlight);
        };
        details.validate()?;

        self.store.simulate_latency().await;

        let mut session = data.session.write().await;
        let accounts = data.accounts.read().await;
        let mut orders = data.orders.write().await;

        let user_id = session.user_id().ok_or(CheckoutError::NoActiveSession)?;
        if session.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let is_vip = accounts.find(user_id).is_some_and(|u| u.is_vip);
        let summary = CartSummary::compute(session.cart(), is_vip);
        let order = insert_order(
            &mut orders,
            user_id,
            session.cart().to_vec(),
            summary.total,
            details.address.trim().to_string(),
            Utc::now(),
        )?;
        session.cart.clear();

        info!(
            order_id = %order.id,
            %user_id,
            total = %order.total_amount,
            "Order placed"
        );
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use flipmart_core::{OrderStatus, Price, ProductId};

    use super::*;
    use crate::seed::Seed;
    use crate::state::StoreOptions;

    async fn signed_in(store: &Store, email: &str) {
        store.accounts().authenticate(email, "password").await.unwrap();
    }

    async fn add(store: &Store, id: i64, quantity: u32) {
        let product = store.catalog().product(ProductId::new(id)).await.unwrap();
        store.cart().add_item(&product, quantity).await.unwrap();
    }

    #[tokio::test]
    async fn test_details_prefill_from_user() {
        let store = Store::demo().unwrap();
        assert_eq!(
            store.checkout().details().await.unwrap_err(),
            CheckoutError::NoActiveSession
        );

        signed_in(&store, "jane.smith@example.com").await;
        let details = store.checkout().details().await.unwrap();
        assert_eq!(details.name, "Jane Smith");
        assert_eq!(details.address, "456 Code Avenue, Bangalore, KA 560001");
    }

    #[tokio::test]
    async fn test_place_order_snapshots_total_and_clears_cart() {
        let store = Store::demo().unwrap();
        signed_in(&store, "john.doe@example.com").await;
        add(&store, 201, 1).await;

        let mut details = store.checkout().details().await.unwrap();
        details.address = "221B Baker Street".to_string();
        let order = store.checkout().place_order(&details).await.unwrap();

        assert_eq!(order.status, OrderStatus::PendingConfirmation);
        assert_eq!(order.total_amount, Price::from_rupees(89_910));
        assert_eq!(order.address, "221B Baker Street");
        assert_eq!(order.items.len(), 1);
        assert!(store.cart().items().await.is_empty());
    }

    #[tokio::test]
    async fn test_place_order_requires_session_and_items() {
        let store = Store::demo().unwrap();
        let details = CheckoutDetails {
            name: "A".to_string(),
            phone: "1".to_string(),
            address: "B".to_string(),
        };
        add(&store, 701, 1).await;
        assert_eq!(
            store.checkout().place_order(&details).await.unwrap_err(),
            CheckoutError::NoActiveSession
        );

        store.cart().clear().await;
        signed_in(&store, "jane.smith@example.com").await;
        assert_eq!(
            store.checkout().place_order(&details).await.unwrap_err(),
            CheckoutError::EmptyCart
        );
        assert_eq!(store.orders().orders().await.len(), 4);
    }

    #[tokio::test]
    async fn test_blank_address_is_rejected() {
        let store = Store::demo().unwrap();
        signed_in(&store, "jane.smith@example.com").await;
        add(&store, 701, 1).await;

        let mut details = store.checkout().details().await.unwrap();
        details.address = "  ".to_string();
        assert_eq!(
            store.checkout().place_order(&details).await.unwrap_err(),
            CheckoutError::MissingField("address")
        );
        assert_eq!(store.cart().count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_refused() {
        let options = StoreOptions {
            latency: Duration::from_millis(20),
            ..StoreOptions::default()
        };
        let store = Store::new(options, Seed::demo(Utc::now()).unwrap()).unwrap();
        signed_in(&store, "jane.smith@example.com").await;
        add(&store, 701, 2).await;
        let details = store.checkout().details().await.unwrap();

        let checkout = store.checkout();
        let (first, second) = tokio::join!(
            checkout.place_order(&details),
            checkout.place_order(&details)
        );

        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), CheckoutError::AlreadyInFlight);
        assert_eq!(store.orders().orders().await.len(), 5);

        add(&store, 701, 1).await;
        store.checkout().place_order(&details).await.unwrap();
    }

    #[tokio::test]
    async fn test_payment_display_uses_cart_total() {
        let store = Store::demo().unwrap();
        assert_eq!(
            store.checkout().payment().await.unwrap_err(),
            CheckoutError::EmptyCart
        );

        add(&store, 701, 2).await;
        let payment = store.checkout().payment().await.unwrap();
        assert_eq!(payment.amount, Price::from_rupees(500));
        assert_eq!(payment.upi_id, "your-upi-id@oksbi");
    }
}
