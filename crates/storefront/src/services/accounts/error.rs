//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No user has the given email.
    #[error("user not found")]
    NotFound,

    /// The account exists but is blocked. Checked before the secret.
    #[error("account is blocked")]
    Blocked,

    /// The secret does not match.
    #[error("invalid credentials")]
    InvalidCredential,

    /// The operation needs operator privilege on the session.
    #[error("operator privilege required")]
    OperatorRequired,
}

impl AuthError {
    /// Message shown on the login form.
    ///
    /// Unknown email and wrong secret read the same so the form does not
    /// reveal which accounts exist.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::NotFound | Self::InvalidCredential => "Invalid email or password.",
            Self::Blocked => {
                "Your account has been blocked due to a report. Please contact support."
            }
            Self::OperatorRequired => "Please log in as an administrator.",
        }
    }
}
