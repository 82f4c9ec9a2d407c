//! Order error types.

use core::fmt;

use thiserror::Error;

use flipmart_core::{OrderId, OrderStatus};

use crate::error::NotFoundError;

/// An operator or checkout action on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Payment verified; pending order becomes placed.
    ConfirmPayment,
    /// Payment rejected; pending order is cancelled.
    RejectPayment,
    /// Manual fulfillment override to the given stage.
    Advance(OrderStatus),
    Cancel,
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ConfirmPayment => "confirm payment for",
            Self::RejectPayment => "reject payment for",
            Self::Advance(OrderStatus::PendingConfirmation) => "reopen",
            Self::Advance(OrderStatus::Placed) => "place",
            Self::Advance(OrderStatus::Dispatched) => "dispatch",
            Self::Advance(OrderStatus::Delivered) => "deliver",
            Self::Advance(OrderStatus::Cancelled) | Self::Cancel => "cancel",
        })
    }
}

/// A transition was attempted outside its permitted source state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderTransitionError {
    #[error("cannot {action} order {order_id} while it is {status}")]
    InvalidState {
        order_id: OrderId,
        status: OrderStatus,
        action: OrderAction,
    },
}

/// Errors that can occur during order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error(transparent)]
    Transition(#[from] OrderTransitionError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Orders need at least one line.
    #[error("an order needs at least one item")]
    EmptyItems,
}
