//! Flipmart Core - Shared domain types.
//!
//! This crate provides the vocabulary used across all Flipmart components:
//! - `storefront` - The transactional domain model (accounts, catalog, cart, orders)
//! - `cli` - Command-line front end for seeding and simulating sessions
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no async runtime, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, secrets, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
