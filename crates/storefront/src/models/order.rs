//! Order record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use flipmart_core::{OrderId, OrderStatus, Price, UserId};

use super::cart::CartItem;

/// A placed order.
///
/// `items` and `total_amount` are snapshots taken at checkout; later catalog
/// price changes never touch them. Only `status` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Weak reference to the customer; the directory owns the user record.
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Shipping address entered at checkout.
    pub address: String,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }
}
