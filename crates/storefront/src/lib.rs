//! Flipmart Storefront - transactional domain model.
//!
//! Everything here lives in process memory. A [`state::Store`] is built from
//! a seed dataset and handed by reference to each service:
//!
//! - [`services::accounts::AccountDirectory`] - users, credentials, the active session
//! - [`services::catalog::CatalogStore`] - categories and products
//! - [`services::cart::CartLedger`] - the active session's cart and its pricing
//! - [`services::orders::OrderLifecycle`] - order records and their status machine
//! - [`services::checkout::Checkout`] - turns the cart into an order
//! - [`services::operator::Operator`] - privileged cascades, settings, dashboard
//!
//! Restarting the process discards all state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod seed;
pub mod services;
pub mod state;

pub use error::{AppError, Result};
pub use state::{Store, StoreOptions};
