//! Status enums for accounts and orders.
//!
//! # Order lifecycle
//!
//! ```text
//! PendingConfirmation ──confirm──▶ Placed ──▶ Dispatched ──▶ Delivered
//!         │                          │            │
//!         └──reject──┐               └──cancel────┴──▶ Cancelled
//!                    ▼
//!                Cancelled
//! ```
//!
//! `Delivered` and `Cancelled` are terminal.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether a customer account may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Blocked,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Blocked => f.write_str("Blocked"),
        }
    }
}

/// Order status.
///
/// Serialized with the human-readable names used in seed files
/// (`"Pending Confirmation"`, `"Placed"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Created at checkout, waiting for the operator to verify payment.
    #[default]
    #[serde(rename = "Pending Confirmation")]
    PendingConfirmation,
    Placed,
    Dispatched,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::PendingConfirmation,
        Self::Placed,
        Self::Dispatched,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// No transition leaves a terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Payment can only be confirmed or rejected while pending.
    #[must_use]
    pub const fn awaits_payment_decision(self) -> bool {
        matches!(self, Self::PendingConfirmation)
    }

    /// Statuses from which the operator may cancel.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Placed | Self::Dispatched)
    }

    /// Statuses reachable through the operator's manual fulfillment override.
    #[must_use]
    pub const fn is_fulfillment_stage(self) -> bool {
        matches!(self, Self::Placed | Self::Dispatched | Self::Delivered)
    }

    /// Position on the progress tracker, `None` for cancelled orders.
    #[must_use]
    pub const fn stage_index(self) -> Option<usize> {
        match self {
            Self::PendingConfirmation => Some(0),
            Self::Placed => Some(1),
            Self::Dispatched => Some(2),
            Self::Delivered => Some(3),
            Self::Cancelled => None,
        }
    }

    /// Label shown to customers on the progress tracker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PendingConfirmation => "Awaiting Confirmation",
            Self::Placed => "Placed",
            Self::Dispatched => "Dispatched",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::PendingConfirmation => "Pending Confirmation",
            Self::Placed => "Placed",
            Self::Dispatched => "Dispatched",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-', ' '], "");
        match normalized.as_str() {
            "pendingconfirmation" | "pending" => Ok(Self::PendingConfirmation),
            "placed" => Ok(Self::Placed),
            "dispatched" => Ok(Self::Dispatched),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Operator order list tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderView {
    #[default]
    All,
    /// Waiting for payment confirmation.
    Pending,
    /// Placed or dispatched.
    Active,
    /// Delivered or cancelled.
    Completed,
}

impl OrderView {
    /// Whether an order with `status` belongs in this view.
    #[must_use]
    pub const fn includes(self, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => matches!(status, OrderStatus::PendingConfirmation),
            Self::Active => matches!(status, OrderStatus::Placed | OrderStatus::Dispatched),
            Self::Completed => status.is_terminal(),
        }
    }
}

impl FromStr for OrderView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid order view: {s}")),
        }
    }
}

/// Customer order list tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerOrderView {
    /// Anything not yet delivered or cancelled, including orders awaiting confirmation.
    #[default]
    ActiveOrders,
    /// Delivered or cancelled.
    History,
}

impl CustomerOrderView {
    /// Whether an order with `status` belongs in this view.
    #[must_use]
    pub const fn includes(self, status: OrderStatus) -> bool {
        match self {
            Self::ActiveOrders => !status.is_terminal(),
            Self::History => status.is_terminal(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![OrderStatus::Delivered, OrderStatus::Cancelled]);
    }

    #[test]
    fn test_cancellable_only_mid_fulfillment() {
        assert!(!OrderStatus::PendingConfirmation.is_cancellable());
        assert!(OrderStatus::Placed.is_cancellable());
        assert!(OrderStatus::Dispatched.is_cancellable());
        assert!(!OrderStatus::Delivered.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&OrderStatus::PendingConfirmation).unwrap();
        assert_eq!(json, "\"Pending Confirmation\"");
        let status: OrderStatus = serde_json::from_str("\"Dispatched\"").unwrap();
        assert_eq!(status, OrderStatus::Dispatched);
        let account: AccountStatus = serde_json::from_str("\"blocked\"").unwrap();
        assert_eq!(account, AccountStatus::Blocked);
    }

    #[test]
    fn test_from_str_accepts_loose_spellings() {
        assert_eq!(
            "pending_confirmation".parse::<OrderStatus>().unwrap(),
            OrderStatus::PendingConfirmation
        );
        assert_eq!("Canceled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_stage_index_and_label() {
        assert_eq!(OrderStatus::PendingConfirmation.stage_index(), Some(0));
        assert_eq!(OrderStatus::Delivered.stage_index(), Some(3));
        assert_eq!(OrderStatus::Cancelled.stage_index(), None);
        assert_eq!(OrderStatus::PendingConfirmation.label(), "Awaiting Confirmation");
    }

    #[test]
    fn test_operator_views_partition_statuses() {
        for status in OrderStatus::ALL {
            let hits = [OrderView::Pending, OrderView::Active, OrderView::Completed]
                .into_iter()
                .filter(|v| v.includes(status))
                .count();
            assert_eq!(hits, 1, "{status} should appear in exactly one tab");
            assert!(OrderView::All.includes(status));
        }
    }

    #[test]
    fn test_customer_views() {
        assert!(CustomerOrderView::ActiveOrders.includes(OrderStatus::PendingConfirmation));
        assert!(CustomerOrderView::ActiveOrders.includes(OrderStatus::Dispatched));
        assert!(CustomerOrderView::History.includes(OrderStatus::Cancelled));
        assert!(!CustomerOrderView::History.includes(OrderStatus::Placed));
    }
}
