//! Domain models for the storefront.
//!
//! Plain data. Invariants that span records (one cart line per product,
//! products always pointing at an existing category, order status rules)
//! are enforced by the services that own each collection.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod session;
pub mod settings;
pub mod user;

pub use cart::{CartItem, CartSummary, VIP_DISCOUNT_RATE};
pub use catalog::{Category, Product};
pub use order::Order;
pub use session::{ActiveIdentity, Session};
pub use settings::PaymentSettings;
pub use user::User;
