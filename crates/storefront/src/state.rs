//! The in-memory store shared by every service.
//!
//! A [`Store`] is cheaply cloneable via `Arc` and is passed by reference to
//! each service constructor; there is no ambient global.
//!
//! # Locking
//!
//! Each collection sits behind its own `tokio::sync::RwLock`. A mutation
//! takes every lock it needs up front and commits inside that critical
//! section, so no operation is ever partially applied. When more than one
//! lock is held they are always taken in this order:
//!
//! `session` → `accounts` → `catalog` → `orders` → `settings`

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;

use flipmart_core::{Passphrase, UserId};

use crate::config::StorefrontConfig;
use crate::models::{Category, Order, PaymentSettings, Product, Session, User};
use crate::seed::{Seed, SeedError};

/// Options that shape a [`Store`] independent of its seed data.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Awaited before each network-like operation commits.
    pub latency: Duration,
    pub operator_username: String,
    pub operator_secret: Passphrase,
    /// Secret for seed users that carry none.
    pub seed_secret: Passphrase,
    /// Initial UPI payee identifier.
    pub upi_id: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            operator_username: "admin".to_string(),
            operator_secret: Passphrase::new("password"),
            seed_secret: Passphrase::new("password"),
            upi_id: "your-upi-id@oksbi".to_string(),
        }
    }
}

/// Shared in-memory state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

pub(crate) struct StoreInner {
    pub(crate) latency: Duration,
    pub(crate) operator_username: String,
    pub(crate) operator_secret: Passphrase,
    pub(crate) session: RwLock<Session>,
    pub(crate) accounts: RwLock<Accounts>,
    pub(crate) catalog: RwLock<Catalog>,
    pub(crate) orders: RwLock<Vec<Order>>,
    pub(crate) settings: RwLock<PaymentSettings>,
    /// Set while a checkout submission is being processed.
    pub(crate) checkout_in_flight: AtomicBool,
}

/// User records and their secrets.
#[derive(Debug, Default)]
pub(crate) struct Accounts {
    pub(crate) users: Vec<User>,
    pub(crate) secrets: HashMap<UserId, Passphrase>,
}

impl Accounts {
    pub(crate) fn find(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub(crate) fn find_mut(&mut self, user_id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == user_id)
    }

    /// One past the highest ID in use.
    pub(crate) fn next_id(&self) -> UserId {
        let max = self.users.iter().map(|u| u.id.as_i64()).max().unwrap_or(0);
        UserId::new(max.saturating_add(1))
    }
}

/// Categories and products, locked together so category removal and
/// product reassignment commit as one step.
#[derive(Debug, Default)]
pub(crate) struct Catalog {
    pub(crate) categories: Vec<Category>,
    pub(crate) products: Vec<Product>,
}

impl Store {
    /// Build a store from a validated seed.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the seed is not internally consistent.
    pub fn new(options: StoreOptions, seed: Seed) -> Result<Self, SeedError> {
        seed.validate()?;

        let mut accounts = Accounts::default();
        for entry in seed.users {
            let secret = entry
                .secret
                .unwrap_or_else(|| options.seed_secret.clone());
            accounts.secrets.insert(entry.user.id, secret);
            accounts.users.push(entry.user);
        }

        info!(
            users = accounts.users.len(),
            categories = seed.categories.len(),
            products = seed.products.len(),
            orders = seed.orders.len(),
            latency_ms = u64::try_from(options.latency.as_millis()).unwrap_or(u64::MAX),
            "Store initialized from seed"
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                latency: options.latency,
                operator_username: options.operator_username,
                operator_secret: options.operator_secret,
                session: RwLock::new(Session::default()),
                accounts: RwLock::new(accounts),
                catalog: RwLock::new(Catalog {
                    categories: seed.categories,
                    products: seed.products,
                }),
                orders: RwLock::new(seed.orders),
                settings: RwLock::new(PaymentSettings::new(options.upi_id)),
                checkout_in_flight: AtomicBool::new(false),
            }),
        })
    }

    /// Store over the built-in demo dataset with default options.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` only if the demo data itself is malformed.
    pub fn demo() -> Result<Self, SeedError> {
        Self::new(StoreOptions::default(), Seed::demo(chrono::Utc::now())?)
    }

    /// Store shaped by `config`, seeded from `seed_path`, the configured seed
    /// file, or the demo dataset, in that order.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the seed cannot be read or is inconsistent.
    pub fn from_config(config: &StorefrontConfig, seed_path: Option<&Path>) -> Result<Self, SeedError> {
        let seed = match seed_path.or(config.seed_file.as_deref()) {
            Some(path) => {
                info!(path = %path.display(), "Loading seed file");
                Seed::from_path(path)?
            }
            None => Seed::demo(chrono::Utc::now())?,
        };
        Self::new(config.store_options(), seed)
    }

    pub(crate) fn data(&self) -> &StoreInner {
        &self.inner
    }

    /// Wait out the configured latency before a network-like commit.
    pub(crate) async fn simulate_latency(&self) {
        if !self.inner.latency.is_zero() {
            tokio::time::sleep(self.inner.latency).await;
        }
    }

    /// Account directory over this store.
    #[must_use]
    pub const fn accounts(&self) -> crate::services::accounts::AccountDirectory<'_> {
        crate::services::accounts::AccountDirectory::new(self)
    }

    /// Catalog over this store.
    #[must_use]
    pub const fn catalog(&self) -> crate::services::catalog::CatalogStore<'_> {
        crate::services::catalog::CatalogStore::new(self)
    }

    /// Cart ledger for the active session.
    #[must_use]
    pub const fn cart(&self) -> crate::services::cart::CartLedger<'_> {
        crate::services::cart::CartLedger::new(self)
    }

    /// Order lifecycle over this store.
    #[must_use]
    pub const fn orders(&self) -> crate::services::orders::OrderLifecycle<'_> {
        crate::services::orders::OrderLifecycle::new(self)
    }

    /// Checkout flow for the active session.
    #[must_use]
    pub const fn checkout(&self) -> crate::services::checkout::Checkout<'_> {
        crate::services::checkout::Checkout::new(self)
    }

    /// Operator handle, if the session holds operator privilege.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::OperatorRequired` otherwise.
    pub async fn operator(
        &self,
    ) -> Result<crate::services::operator::Operator<'_>, crate::services::accounts::AuthError> {
        crate::services::operator::Operator::authorize(self).await
    }

    /// Current payment settings.
    pub async fn payment_settings(&self) -> PaymentSettings {
        self.inner.settings.read().await.clone()
    }
}
