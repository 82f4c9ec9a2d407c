//! Recommendation error types.

use thiserror::Error;

/// Errors from the recommendation collaborator.
///
/// Never surfaced to shoppers: [`super::RecommendationService`] logs them and
/// serves the fixed suggestions instead.
#[derive(Debug, Error)]
pub enum RecommendationError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
