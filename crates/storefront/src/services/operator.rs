//! Operator tooling.
//!
//! An [`Operator`] handle exists only while the session holds operator
//! privilege. It carries the cascades that span components, the dashboard
//! figures, and payment settings edits.

use serde::Serialize;
use tracing::{info, instrument, warn};

use flipmart_core::{OrderStatus, Price, UserId};

use crate::error::NotFoundError;
use crate::models::{PaymentSettings, User};
use crate::services::accounts::{AccountDirectory, AuthError};
use crate::services::catalog::CatalogStore;
use crate::services::orders::OrderLifecycle;
use crate::services::payment::{SettingsError, image_data_url, normalize_upi_id};
use crate::state::Store;

/// Headline figures for the operator dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Sum of every order total.
    pub total_revenue: Price,
    pub total_orders: usize,
    pub total_products: usize,
    pub total_users: usize,
    /// Orders waiting for payment verification.
    pub pending_confirmation: usize,
}

/// A customer and their orders, removed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRemoval {
    pub user: User,
    pub orders_removed: usize,
}

/// Operator-privileged view of the store.
pub struct Operator<'a> {
    store: &'a Store,
}

impl<'a> Operator<'a> {
    /// Operator handle for a session that holds operator privilege.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::OperatorRequired` otherwise.
    pub async fn authorize(store: &'a Store) -> Result<Self, AuthError> {
        if !store.data().session.read().await.is_operator() {
            warn!("Operator action refused: privilege not held");
            return Err(AuthError::OperatorRequired);
        }
        Ok(Self { store })
    }

    #[must_use]
    pub const fn accounts(&self) -> AccountDirectory<'a> {
        AccountDirectory::new(self.store)
    }

    #[must_use]
    pub const fn catalog(&self) -> CatalogStore<'a> {
        CatalogStore::new(self.store)
    }

    #[must_use]
    pub const fn orders(&self) -> OrderLifecycle<'a> {
        OrderLifecycle::new(self.store)
    }

    /// Delete a customer: their orders first, then the user record.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if no user has that ID; nothing is removed.
    #[instrument(skip(self))]
    pub async fn remove_customer(&self, user_id: UserId) -> Result<CustomerRemoval, NotFoundError> {
        self.accounts().user(user_id).await?;

        let orders_removed = self.orders().delete_orders_for_user(user_id).await;
        let user = self.accounts().delete_user(user_id).await?;

        info!(orders_removed, "Customer removed");
        Ok(CustomerRemoval {
            user,
            orders_removed,
        })
    }

    /// Figures for the dashboard.
    pub async fn dashboard(&self) -> DashboardStats {
        let data = self.store.data();
        let total_users = data.accounts.read().await.users.len();
        let total_products = data.catalog.read().await.products.len();
        let orders = data.orders.read().await;

        DashboardStats {
            total_revenue: orders.iter().map(|o| o.total_amount).sum(),
            total_orders: orders.len(),
            total_products,
            total_users,
            pending_confirmation: orders
                .iter()
                .filter(|o| o.status == OrderStatus::PendingConfirmation)
                .count(),
        }
    }

    // =========================================================================
    // Payment settings
    // =========================================================================

    /// Change the UPI payee identifier.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::EmptyUpiId` for a blank value.
    #[instrument(skip(self))]
    pub async fn update_upi_id(&self, upi_id: &str) -> Result<PaymentSettings, SettingsError> {
        let upi_id = normalize_upi_id(upi_id)?;
        self.store.simulate_latency().await;

        let mut settings = self.store.data().settings.write().await;
        settings.upi_id = upi_id;

        info!(upi_id = %settings.upi_id, "UPI ID updated");
        Ok(settings.clone())
    }

    /// Set or clear the custom QR image reference.
    #[instrument(skip(self, image))]
    pub async fn update_custom_qr(&self, image: Option<String>) -> PaymentSettings {
        self.store.simulate_latency().await;

        let mut settings = self.store.data().settings.write().await;
        settings.custom_qr_image = image.filter(|i| !i.trim().is_empty());

        info!(custom = settings.custom_qr_image.is_some(), "Custom QR updated");
        settings.clone()
    }

    /// Store an uploaded image as the custom QR.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::NotAnImage` or `SettingsError::EmptyImage`.
    pub async fn upload_custom_qr(
        &self,
        mime: &str,
        bytes: &[u8],
    ) -> Result<PaymentSettings, SettingsError> {
        let data_url = image_data_url(mime, bytes)?;
        Ok(self.update_custom_qr(Some(data_url)).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn operator(store: &Store) -> Operator<'_> {
        store
            .accounts()
            .operator_login("admin", "password")
            .await
            .unwrap();
        Operator::authorize(store).await.unwrap()
    }

    #[tokio::test]
    async fn test_authorize_requires_privilege() {
        let store = Store::demo().unwrap();
        assert_eq!(
            Operator::authorize(&store).await.err(),
            Some(AuthError::OperatorRequired)
        );
    }

    #[tokio::test]
    async fn test_remove_customer_cascades_orders() {
        let store = Store::demo().unwrap();
        let operator = operator(&store).await;

        let removal = operator.remove_customer(UserId::new(1)).await.unwrap();
        assert_eq!(removal.orders_removed, 2);
        assert_eq!(removal.user.name, "John Doe");

        let orders = store.orders().orders().await;
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.user_id != UserId::new(1)));
        assert!(store.accounts().user(UserId::new(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_unknown_customer_touches_nothing() {
        let store = Store::demo().unwrap();
        let operator = operator(&store).await;

        assert!(operator.remove_customer(UserId::new(77)).await.is_err());
        assert_eq!(store.orders().orders().await.len(), 4);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let store = Store::demo().unwrap();
        let stats = operator(&store).await.dashboard().await;

        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.total_products, 15);
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.pending_confirmation, 1);
        // 119999 + 2×150000 + 99900 + 8999 + 3×3999 + 55000
        assert_eq!(stats.total_revenue, Price::from_rupees(595_895));
    }

    #[tokio::test]
    async fn test_payment_settings_edits() {
        let store = Store::demo().unwrap();
        let operator = operator(&store).await;

        let settings = operator.update_upi_id(" shop@okhdfc ").await.unwrap();
        assert_eq!(settings.upi_id, "shop@okhdfc");
        assert_eq!(
            operator.update_upi_id("").await.unwrap_err(),
            SettingsError::EmptyUpiId
        );

        let settings = operator.upload_custom_qr("image/png", b"png").await.unwrap();
        assert!(
            settings
                .custom_qr_image
                .as_deref()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );

        operator.update_custom_qr(None).await;
        assert!(store.payment_settings().await.custom_qr_image.is_none());
        assert_eq!(store.payment_settings().await.upi_id, "shop@okhdfc");
    }
}
