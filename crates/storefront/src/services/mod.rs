//! Business logic services for the storefront.
//!
//! Every service borrows the [`crate::Store`] it operates on. Cross-entity
//! cascades are explicit calls made by the caller (or by [`operator`]), never
//! hidden side effects of another component.
//!
//! # Services
//!
//! - `accounts` - Users, credentials, the active session, operator privilege
//! - `catalog` - Categories and products, fallback reassignment on category removal
//! - `cart` - The active session's cart and its VIP-aware pricing
//! - `orders` - Order records and the status state machine
//! - `checkout` - Cart to order materialization
//! - `operator` - Privileged cascades, payment settings, dashboard
//! - `payment` - UPI payment display
//! - `recommendations` - Advisory "related product" suggestions

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod operator;
pub mod orders;
pub mod payment;
pub mod recommendations;
