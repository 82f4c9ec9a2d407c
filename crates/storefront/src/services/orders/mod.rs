//! Order lifecycle.
//!
//! Owns every order record and enforces the status state machine. Each
//! transition reads and writes the status under one write lock, so two
//! operator actions on the same order are serialized.

mod error;

pub use error::{OrderAction, OrderError, OrderTransitionError};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use flipmart_core::{CustomerOrderView, OrderId, OrderStatus, OrderView, Price, UserId};

use crate::error::{Entity, NotFoundError};
use crate::models::{CartItem, Order};
use crate::state::Store;

/// Status `action` leads to from `current`, or `None` if not permitted.
///
/// `Advance` moves between `Placed`, `Dispatched` and `Delivered` in either
/// direction, but never leaves a pending or terminal order and never
/// targets `Cancelled`.
#[must_use]
pub fn next_status(current: OrderStatus, action: OrderAction) -> Option<OrderStatus> {
    match action {
        OrderAction::ConfirmPayment if current.awaits_payment_decision() => {
            Some(OrderStatus::Placed)
        }
        OrderAction::RejectPayment if current.awaits_payment_decision() => {
            Some(OrderStatus::Cancelled)
        }
        OrderAction::Cancel if current.is_cancellable() => Some(OrderStatus::Cancelled),
        OrderAction::Advance(target)
            if current.is_cancellable() && target.is_fulfillment_stage() && target != current =>
        {
            Some(target)
        }
        _ => None,
    }
}

/// Build a pending order and put it at the front of `orders`.
///
/// The ID is `OD` plus the creation time in milliseconds, bumped until it is
/// unused.
pub(crate) fn insert_order(
    orders: &mut Vec<Order>,
    user_id: UserId,
    items: Vec<CartItem>,
    total_amount: Price,
    address: String,
    now: DateTime<Utc>,
) -> Result<Order, OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyItems);
    }

    let mut millis = now.timestamp_millis();
    let mut id = OrderId::from_millis(millis);
    while orders.iter().any(|o| o.id == id) {
        millis = millis.saturating_add(1);
        id = OrderId::from_millis(millis);
    }

    let order = Order {
        id,
        user_id,
        items,
        total_amount,
        status: OrderStatus::PendingConfirmation,
        created_at: now,
        address,
    };
    orders.insert(0, order.clone());
    Ok(order)
}

/// Order service.
pub struct OrderLifecycle<'a> {
    store: &'a Store,
}

impl<'a> OrderLifecycle<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Record a new order in `PendingConfirmation`.
    ///
    /// `items` and `total_amount` are stored as given and never recomputed.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyItems` if `items` is empty.
    #[instrument(skip(self, items, address), fields(lines = items.len()))]
    pub async fn create_order(
        &self,
        user_id: UserId,
        items: Vec<CartItem>,
        total_amount: Price,
        address: &str,
    ) -> Result<Order, OrderError> {
        let mut orders = self.store.data().orders.write().await;
        let order = insert_order(
            &mut orders,
            user_id,
            items,
            total_amount,
            address.trim().to_string(),
            Utc::now(),
        )?;

        info!(order_id = %order.id, total = %order.total_amount, "Order created");
        Ok(order)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Operator verified the payment: `PendingConfirmation` → `Placed`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Transition` from any other status and
    /// `OrderError::NotFound` for an unknown ID.
    pub async fn confirm_payment(&self, order_id: &OrderId) -> Result<Order, OrderError> {
        self.apply(order_id, OrderAction::ConfirmPayment).await
    }

    /// Operator rejected the payment: `PendingConfirmation` → `Cancelled`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Transition` from any other status and
    /// `OrderError::NotFound` for an unknown ID.
    pub async fn reject_payment(&self, order_id: &OrderId) -> Result<Order, OrderError> {
        self.apply(order_id, OrderAction::RejectPayment).await
    }

    /// Manual fulfillment override among `Placed`, `Dispatched` and
    /// `Delivered`. Stages may be skipped or stepped back while the order is
    /// not yet delivered.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Transition` unless the order is `Placed` or
    /// `Dispatched` and `next` is a different fulfillment stage, and
    /// `OrderError::NotFound` for an unknown ID.
    pub async fn advance(&self, order_id: &OrderId, next: OrderStatus) -> Result<Order, OrderError> {
        self.apply(order_id, OrderAction::Advance(next)).await
    }

    /// Cancel a `Placed` or `Dispatched` order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Transition` from any other status and
    /// `OrderError::NotFound` for an unknown ID.
    pub async fn cancel(&self, order_id: &OrderId) -> Result<Order, OrderError> {
        self.apply(order_id, OrderAction::Cancel).await
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn apply(&self, order_id: &OrderId, action: OrderAction) -> Result<Order, OrderError> {
        let mut orders = self.store.data().orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| &o.id == order_id)
            .ok_or_else(|| NotFoundError::new(Entity::Order, order_id))?;

        let from = order.status;
        let Some(to) = next_status(from, action) else {
            warn!(status = %from, %action, "Order transition refused");
            return Err(OrderTransitionError::InvalidState {
                order_id: order_id.clone(),
                status: from,
                action,
            }
            .into());
        };
        order.status = to;

        info!(%from, %to, "Order status changed");
        Ok(order.clone())
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Hard-delete one order regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` for an unknown ID.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_order(&self, order_id: &OrderId) -> Result<Order, NotFoundError> {
        let mut orders = self.store.data().orders.write().await;
        let index = orders
            .iter()
            .position(|o| &o.id == order_id)
            .ok_or_else(|| NotFoundError::new(Entity::Order, order_id))?;
        let removed = orders.remove(index);

        info!("Order deleted");
        Ok(removed)
    }

    /// Remove every order of `user_id`, returning how many were removed.
    #[instrument(skip(self))]
    pub async fn delete_orders_for_user(&self, user_id: UserId) -> usize {
        let mut orders = self.store.data().orders.write().await;
        let before = orders.len();
        orders.retain(|o| o.user_id != user_id);
        let removed = before - orders.len();

        info!(removed, "Orders deleted for user");
        removed
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All orders, newest first.
    pub async fn orders(&self) -> Vec<Order> {
        self.store.data().orders.read().await.clone()
    }

    /// Look up one order.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` for an unknown ID.
    pub async fn order(&self, order_id: &OrderId) -> Result<Order, NotFoundError> {
        self.store
            .data()
            .orders
            .read()
            .await
            .iter()
            .find(|o| &o.id == order_id)
            .cloned()
            .ok_or_else(|| NotFoundError::new(Entity::Order, order_id))
    }

    /// Orders in an operator tab.
    pub async fn orders_in_view(&self, view: OrderView) -> Vec<Order> {
        self.filtered(|o| view.includes(o.status)).await
    }

    /// Every order of one customer.
    pub async fn orders_for_user(&self, user_id: UserId) -> Vec<Order> {
        self.filtered(|o| o.user_id == user_id).await
    }

    /// One customer's orders in a customer tab.
    pub async fn customer_orders(&self, user_id: UserId, view: CustomerOrderView) -> Vec<Order> {
        self.filtered(|o| o.user_id == user_id && view.includes(o.status))
            .await
    }

    async fn filtered(&self, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
        self.store
            .data()
            .orders
            .read()
            .await
            .iter()
            .filter(|&o| keep(o))
            .cloned()
            .collect()
    }
}
