//! Plain-value login secrets.
//!
//! Secrets are stored and compared as-is. There is no hashing: the store is
//! in-memory only and the checkout flow records operator-verified intent
//! rather than real payments.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A login secret for a customer account or the operator.
///
/// `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Passphrase(String);

impl Passphrase {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Compare against raw input.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

impl fmt::Display for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_exact_value() {
        let secret = Passphrase::new("password");
        assert!(secret.matches("password"));
        assert!(!secret.matches("Password"));
        assert!(!secret.matches("password "));
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = Passphrase::new("hunter2");
        assert!(!format!("{secret:?}").contains("hunter2"));
        assert!(!secret.to_string().contains("hunter2"));
    }
}
