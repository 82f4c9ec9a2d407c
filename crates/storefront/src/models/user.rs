//! Customer account types.

use serde::{Deserialize, Serialize};

use flipmart_core::{AccountStatus, Email, UserId};

/// A registered customer.
///
/// Field names follow the seed file format (`isVIP`, camelCase otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    /// Default shipping address, empty until the customer fills it in.
    #[serde(default)]
    pub address: String,
    #[serde(rename = "isVIP", default)]
    pub is_vip: bool,
    #[serde(default)]
    pub status: AccountStatus,
}

impl User {
    /// Whether the account is barred from signing in.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.status == AccountStatus::Blocked
    }
}
