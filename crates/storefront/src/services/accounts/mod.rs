//! Account directory.
//!
//! Owns user records, their plain-value secrets, the active session
//! identity, and the operator privilege flag.
//!
//! Deleting a user does not touch orders. Callers remove the user's orders
//! through [`crate::services::orders::OrderLifecycle::delete_orders_for_user`]
//! first (see [`crate::services::operator::Operator::remove_customer`]).

mod error;

pub use error::AuthError;

use tracing::{info, instrument, warn};

use flipmart_core::{AccountStatus, Email, Passphrase, UserId};

use crate::error::{Entity, NotFoundError};
use crate::models::User;
use crate::state::Store;

/// Account directory service.
pub struct AccountDirectory<'a> {
    store: &'a Store,
}

impl<'a> AccountDirectory<'a> {
    /// Create a directory over `store`.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    // =========================================================================
    // Sign-in
    // =========================================================================

    /// Sign in with email and secret.
    ///
    /// The first user with a matching email wins. A blocked account is
    /// refused before the secret is checked. On success the user becomes the
    /// active session identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound`, `AuthError::Blocked`, or
    /// `AuthError::InvalidCredential`.
    #[instrument(skip(self, secret))]
    pub async fn authenticate(&self, email: &str, secret: &str) -> Result<User, AuthError> {
        self.store.simulate_latency().await;

        let data = self.store.data();
        let mut session = data.session.write().await;
        let accounts = data.accounts.read().await;

        let user = accounts
            .users
            .iter()
            .find(|u| u.email.matches(email))
            .ok_or_else(|| {
                warn!("Login attempt for unknown email");
                AuthError::NotFound
            })?;

        if user.is_blocked() {
            warn!(user_id = %user.id, "Login refused for blocked account");
            return Err(AuthError::Blocked);
        }

        let secret_matches = accounts
            .secrets
            .get(&user.id)
            .is_some_and(|stored| stored.matches(secret));
        if !secret_matches {
            warn!(user_id = %user.id, "Login refused: invalid credential");
            return Err(AuthError::InvalidCredential);
        }

        let session_id = session.begin(user.clone());
        info!(user_id = %user.id, %session_id, "User logged in");
        Ok(user.clone())
    }

    /// Register a new customer and sign them in.
    ///
    /// Always succeeds. Email uniqueness is not enforced, so a second account
    /// may share an address; sign-in then resolves to the older account.
    #[instrument(skip(self, name, phone, secret), fields(email = %email))]
    pub async fn register(&self, name: &str, phone: &str, email: Email, secret: &str) -> User {
        self.store.simulate_latency().await;

        let data = self.store.data();
        let mut session = data.session.write().await;
        let mut accounts = data.accounts.write().await;

        let user = User {
            id: accounts.next_id(),
            name: name.trim().to_string(),
            email,
            phone: phone.trim().to_string(),
            address: String::new(),
            is_vip: false,
            status: AccountStatus::Active,
        };
        accounts.secrets.insert(user.id, Passphrase::new(secret));
        accounts.users.push(user.clone());

        let session_id = session.begin(user.clone());
        info!(user_id = %user.id, %session_id, "User registered");
        user
    }

    /// End the active session, including any operator privilege.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let mut session = self.store.data().session.write().await;
        if let Some(user_id) = session.user_id() {
            info!(%user_id, "User logged out");
        }
        session.end();
    }

    // =========================================================================
    // Operator privilege
    // =========================================================================

    /// Grant operator privilege to the session.
    ///
    /// Checked against the fixed operator credential pair, independent of the
    /// user directory.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredential` if either value is wrong.
    #[instrument(skip(self, secret))]
    pub async fn operator_login(&self, username: &str, secret: &str) -> Result<(), AuthError> {
        self.store.simulate_latency().await;

        let data = self.store.data();
        if username != data.operator_username || !data.operator_secret.matches(secret) {
            warn!("Operator login refused");
            return Err(AuthError::InvalidCredential);
        }

        data.session.write().await.set_operator(true);
        info!("Operator logged in");
        Ok(())
    }

    /// Drop operator privilege, keeping any customer identity.
    pub async fn operator_logout(&self) {
        self.store.data().session.write().await.set_operator(false);
        info!("Operator logged out");
    }

    /// Whether the session holds operator privilege.
    pub async fn is_operator(&self) -> bool {
        self.store.data().session.read().await.is_operator()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Snapshot of the active session identity.
    pub async fn current_user(&self) -> Option<User> {
        self.store.data().session.read().await.user().cloned()
    }

    /// Whether the active identity is currently flagged VIP.
    ///
    /// Reads the live directory record, so a VIP toggle takes effect on the
    /// next read without touching the session.
    pub async fn active_user_is_vip(&self) -> bool {
        let data = self.store.data();
        let session = data.session.read().await;
        let Some(user_id) = session.user_id() else {
            return false;
        };
        data.accounts
            .read()
            .await
            .find(user_id)
            .is_some_and(|u| u.is_vip)
    }

    /// All users in registration order.
    pub async fn users(&self) -> Vec<User> {
        self.store.data().accounts.read().await.users.clone()
    }

    /// Look up one user.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if no user has that ID.
    pub async fn user(&self, user_id: UserId) -> Result<User, NotFoundError> {
        self.store
            .data()
            .accounts
            .read()
            .await
            .find(user_id)
            .cloned()
            .ok_or_else(|| NotFoundError::new(Entity::User, &user_id))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace the stored record for `user.id`, refreshing the session
    /// snapshot if it is the active identity.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if no user has that ID.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn update_profile(&self, user: User) -> Result<(), NotFoundError> {
        let data = self.store.data();
        let mut session = data.session.write().await;
        let mut accounts = data.accounts.write().await;

        let stored = accounts
            .find_mut(user.id)
            .ok_or_else(|| NotFoundError::new(Entity::User, &user.id))?;
        *stored = user;
        session.refresh_user(stored);

        info!("Profile updated");
        Ok(())
    }

    /// Set the blocked flag.
    ///
    /// Blocking the active identity while it is `Active` terminates the
    /// session in the same step.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if no user has that ID.
    #[instrument(skip(self))]
    pub async fn set_blocked(&self, user_id: UserId, blocked: bool) -> Result<(), NotFoundError> {
        let data = self.store.data();
        let mut session = data.session.write().await;
        let mut accounts = data.accounts.write().await;

        let user = accounts
            .find_mut(user_id)
            .ok_or_else(|| NotFoundError::new(Entity::User, &user_id))?;
        let previous = user.status;
        user.status = if blocked {
            AccountStatus::Blocked
        } else {
            AccountStatus::Active
        };

        if blocked && previous == AccountStatus::Active && session.is_active_user(user_id) {
            session.end();
            info!("Blocked the active user; session terminated");
        } else {
            session.refresh_user(user);
        }

        info!(status = %user.status, "Account status updated");
        Ok(())
    }

    /// Set the VIP flag. The session snapshot is left alone.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if no user has that ID.
    #[instrument(skip(self))]
    pub async fn set_vip(&self, user_id: UserId, vip: bool) -> Result<(), NotFoundError> {
        let mut accounts = self.store.data().accounts.write().await;
        let user = accounts
            .find_mut(user_id)
            .ok_or_else(|| NotFoundError::new(Entity::User, &user_id))?;
        user.is_vip = vip;

        info!("VIP flag updated");
        Ok(())
    }

    /// Remove a user record and its secret.
    ///
    /// Orders are not touched. If the user is the active identity the
    /// session ends as well.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError` if no user has that ID.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: UserId) -> Result<User, NotFoundError> {
        let data = self.store.data();
        let mut session = data.session.write().await;
        let mut accounts = data.accounts.write().await;

        let index = accounts
            .users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| NotFoundError::new(Entity::User, &user_id))?;
        let removed = accounts.users.remove(index);
        accounts.secrets.remove(&user_id);

        if session.is_active_user(user_id) {
            session.end();
        }

        info!("User deleted");
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn jane_id() -> UserId {
        UserId::new(2)
    }

    #[tokio::test]
    async fn test_authenticate_success_sets_session() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();

        let user = accounts
            .authenticate("jane.smith@example.com", "password")
            .await
            .unwrap();
        assert_eq!(user.id, jane_id());
        assert_eq!(accounts.current_user().await.unwrap().id, jane_id());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let store = Store::demo().unwrap();
        let err = store
            .accounts()
            .authenticate("nobody@example.com", "password")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::NotFound);
        assert!(store.accounts().current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_blocked_check_precedes_secret_check() {
        let store = Store::demo().unwrap();
        let err = store
            .accounts()
            .authenticate("sam.brown@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Blocked);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_secret() {
        let store = Store::demo().unwrap();
        let err = store
            .accounts()
            .authenticate("john.doe@example.com", "letmein")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredential);
    }

    #[tokio::test]
    async fn test_register_assigns_fresh_id_and_signs_in() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();

        let email = Email::parse("priya@example.com").unwrap();
        let user = accounts.register("Priya", "999", email, "hunter2").await;
        assert_eq!(user.id, UserId::new(4));
        assert_eq!(user.status, AccountStatus::Active);
        assert!(!user.is_vip);
        assert_eq!(accounts.current_user().await.unwrap().id, user.id);

        accounts.logout().await;
        accounts
            .authenticate("priya@example.com", "hunter2")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_email_first_match_wins() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();

        let email = Email::parse("jane.smith@example.com").unwrap();
        let twin = accounts.register("Jane Twin", "1", email, "other").await;
        assert_eq!(accounts.users().await.len(), 4);

        accounts.logout().await;
        let err = accounts
            .authenticate("jane.smith@example.com", "other")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredential);
        let user = accounts
            .authenticate("jane.smith@example.com", "password")
            .await
            .unwrap();
        assert_ne!(user.id, twin.id);
    }

    #[tokio::test]
    async fn test_update_profile_refreshes_session() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();
        let mut user = accounts
            .authenticate("jane.smith@example.com", "password")
            .await
            .unwrap();

        user.address = "12 MG Road, Pune".to_string();
        accounts.update_profile(user).await.unwrap();

        assert_eq!(
            accounts.current_user().await.unwrap().address,
            "12 MG Road, Pune"
        );
        assert_eq!(
            accounts.user(jane_id()).await.unwrap().address,
            "12 MG Road, Pune"
        );
    }

    #[tokio::test]
    async fn test_update_profile_missing_user() {
        let store = Store::demo().unwrap();
        let mut user = store.accounts().user(jane_id()).await.unwrap();
        user.id = UserId::new(404);
        let err = store.accounts().update_profile(user).await.unwrap_err();
        assert_eq!(err.entity, Entity::User);
    }

    #[tokio::test]
    async fn test_blocking_active_user_ends_session() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();
        accounts
            .authenticate("jane.smith@example.com", "password")
            .await
            .unwrap();

        accounts.set_blocked(jane_id(), true).await.unwrap();

        assert!(accounts.current_user().await.is_none());
        assert!(accounts.user(jane_id()).await.unwrap().is_blocked());
    }

    #[tokio::test]
    async fn test_blocking_other_user_keeps_session() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();
        accounts
            .authenticate("jane.smith@example.com", "password")
            .await
            .unwrap();

        accounts.set_blocked(UserId::new(1), true).await.unwrap();

        assert_eq!(accounts.current_user().await.unwrap().id, jane_id());
    }

    #[tokio::test]
    async fn test_unblocked_user_can_sign_in() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();
        accounts.set_blocked(UserId::new(3), false).await.unwrap();
        accounts
            .authenticate("sam.brown@example.com", "password")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_set_vip_reads_live() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();
        accounts
            .authenticate("jane.smith@example.com", "password")
            .await
            .unwrap();
        assert!(!accounts.active_user_is_vip().await);

        accounts.set_vip(jane_id(), true).await.unwrap();

        assert!(accounts.active_user_is_vip().await);
        assert!(!accounts.current_user().await.unwrap().is_vip);
    }

    #[tokio::test]
    async fn test_delete_user_removes_record() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();

        let removed = accounts.delete_user(jane_id()).await.unwrap();
        assert_eq!(removed.name, "Jane Smith");
        assert!(accounts.user(jane_id()).await.is_err());
        assert!(accounts.delete_user(jane_id()).await.is_err());
    }

    #[tokio::test]
    async fn test_operator_login_is_independent_of_users() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();

        assert_eq!(
            accounts.operator_login("admin", "nope").await.unwrap_err(),
            AuthError::InvalidCredential
        );
        assert!(!accounts.is_operator().await);

        accounts.operator_login("admin", "password").await.unwrap();
        assert!(accounts.is_operator().await);
        assert!(accounts.current_user().await.is_none());

        accounts.operator_logout().await;
        assert!(!accounts.is_operator().await);
    }

    #[tokio::test]
    async fn test_logout_clears_operator_privilege() {
        let store = Store::demo().unwrap();
        let accounts = store.accounts();
        accounts
            .authenticate("john.doe@example.com", "password")
            .await
            .unwrap();
        accounts.operator_login("admin", "password").await.unwrap();

        accounts.logout().await;

        assert!(accounts.current_user().await.is_none());
        assert!(!accounts.is_operator().await);
    }
}
