//! The single active session.

use uuid::Uuid;

use flipmart_core::UserId;

use super::cart::CartItem;
use super::user::User;

/// The signed-in customer for the current session.
#[derive(Debug, Clone)]
pub struct ActiveIdentity {
    /// Correlates log lines for one sign-in.
    pub session_id: Uuid,
    /// Snapshot of the user record taken at sign-in, refreshed on profile edits.
    pub user: User,
}

/// Session state: who is signed in, whether operator privilege is held, and
/// the working cart.
///
/// The cart is only mutated through [`crate::services::cart::CartLedger`].
#[derive(Debug, Default)]
pub struct Session {
    identity: Option<ActiveIdentity>,
    is_operator: bool,
    pub(crate) cart: Vec<CartItem>,
}

impl Session {
    /// Establish `user` as the active identity. An existing cart is kept.
    pub(crate) fn begin(&mut self, user: User) -> Uuid {
        let session_id = Uuid::new_v4();
        self.identity = Some(ActiveIdentity { session_id, user });
        session_id
    }

    /// Terminate the session: identity, operator privilege, and cart.
    pub(crate) fn end(&mut self) {
        self.identity = None;
        self.is_operator = false;
        self.cart.clear();
    }

    pub(crate) const fn set_operator(&mut self, is_operator: bool) {
        self.is_operator = is_operator;
    }

    /// Replace the identity snapshot if it belongs to the same user.
    pub(crate) fn refresh_user(&mut self, user: &User) {
        if let Some(identity) = self.identity.as_mut()
            && identity.user.id == user.id
        {
            identity.user = user.clone();
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.identity.as_ref().map(|identity| &identity.user)
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user().map(|user| user.id)
    }

    /// Whether `user_id` is the active identity.
    #[must_use]
    pub fn is_active_user(&self, user_id: UserId) -> bool {
        self.user_id() == Some(user_id)
    }

    #[must_use]
    pub const fn is_operator(&self) -> bool {
        self.is_operator
    }

    #[must_use]
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }
}
