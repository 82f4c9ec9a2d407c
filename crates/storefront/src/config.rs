//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `FLIPMART_SIMULATED_LATENCY_MS` - Artificial delay before network-like operations commit (default: 0)
//! - `FLIPMART_OPERATOR_USERNAME` - Operator login name (default: admin)
//! - `FLIPMART_OPERATOR_SECRET` - Operator login secret (default: password)
//! - `FLIPMART_SEED_SECRET` - Secret for seed users that do not carry one (default: password)
//! - `FLIPMART_UPI_ID` - Initial UPI payee identifier (default: your-upi-id@oksbi)
//! - `FLIPMART_SEED_FILE` - JSON or YAML seed dataset (default: built-in demo data)
//! - `GEMINI_API_KEY` - Enables AI recommendations; static suggestions without it
//! - `GEMINI_MODEL` - Model name (default: gemini-3-flash-preview)
//! - `GEMINI_ENDPOINT` - API base URL (default: <https://generativelanguage.googleapis.com>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use flipmart_core::Passphrase;

use crate::state::StoreOptions;

const DEFAULT_OPERATOR_USERNAME: &str = "admin";
const DEFAULT_SECRET: &str = "password";
const DEFAULT_UPI_ID: &str = "your-upi-id@oksbi";
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Delay awaited before each network-like operation commits
    pub simulated_latency: Duration,
    /// Fixed operator credential pair
    pub operator: OperatorConfig,
    /// Secret assigned to seed users without their own
    pub seed_secret: SecretString,
    /// Initial UPI payee identifier
    pub upi_id: String,
    /// Seed dataset to load instead of the demo data
    pub seed_file: Option<PathBuf>,
    /// Recommendation collaborator, `None` when no API key is configured
    pub recommendations: Option<RecommendationConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Operator login configuration.
#[derive(Clone)]
pub struct OperatorConfig {
    pub username: String,
    pub secret: SecretString,
}

impl std::fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorConfig")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Generative recommendation service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct RecommendationConfig {
    /// API key for the text-generation service
    pub api_key: SecretString,
    /// Model name
    pub model: String,
    /// API base URL
    pub endpoint: String,
}

impl std::fmt::Debug for RecommendationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            simulated_latency: Duration::ZERO,
            operator: OperatorConfig {
                username: DEFAULT_OPERATOR_USERNAME.to_string(),
                secret: SecretString::from(DEFAULT_SECRET),
            },
            seed_secret: SecretString::from(DEFAULT_SECRET),
            upi_id: DEFAULT_UPI_ID.to_string(),
            seed_file: None,
            recommendations: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let latency_ms = get_env_or_default("FLIPMART_SIMULATED_LATENCY_MS", "0")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FLIPMART_SIMULATED_LATENCY_MS".to_string(), e.to_string())
            })?;

        let operator = OperatorConfig {
            username: get_env_or_default("FLIPMART_OPERATOR_USERNAME", DEFAULT_OPERATOR_USERNAME),
            secret: SecretString::from(get_env_or_default(
                "FLIPMART_OPERATOR_SECRET",
                DEFAULT_SECRET,
            )),
        };
        if operator.username.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "FLIPMART_OPERATOR_USERNAME".to_string(),
                "cannot be blank".to_string(),
            ));
        }

        let seed_secret = SecretString::from(get_env_or_default("FLIPMART_SEED_SECRET", DEFAULT_SECRET));
        let upi_id = get_env_or_default("FLIPMART_UPI_ID", DEFAULT_UPI_ID);
        let seed_file = get_optional_env("FLIPMART_SEED_FILE").map(PathBuf::from);
        let recommendations = RecommendationConfig::from_env();

        Ok(Self {
            simulated_latency: Duration::from_millis(latency_ms),
            operator,
            seed_secret,
            upi_id,
            seed_file,
            recommendations,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Options for building a [`crate::Store`] from this configuration.
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            latency: self.simulated_latency,
            operator_username: self.operator.username.clone(),
            operator_secret: Passphrase::new(self.operator.secret.expose_secret()),
            seed_secret: Passphrase::new(self.seed_secret.expose_secret()),
            upi_id: self.upi_id.clone(),
        }
    }
}

impl RecommendationConfig {
    /// Load recommendation settings; `None` when `GEMINI_API_KEY` is unset.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = get_optional_env("GEMINI_API_KEY")?;
        Some(Self {
            api_key: SecretString::from(api_key),
            model: get_env_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            endpoint: get_env_or_default("GEMINI_ENDPOINT", DEFAULT_GEMINI_ENDPOINT),
        })
    }
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable or a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_variable_names_the_variable() {
        let err = ConfigError::InvalidEnvVar(
            "FLIPMART_SIMULATED_LATENCY_MS".to_string(),
            "invalid digit found in string".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "Invalid environment variable FLIPMART_SIMULATED_LATENCY_MS: invalid digit found in string"
        );
    }

    #[test]
    fn test_default_matches_demo_credentials() {
        let config = StorefrontConfig::default();
        assert_eq!(config.operator.username, "admin");
        assert_eq!(config.operator.secret.expose_secret(), "password");
        assert_eq!(config.upi_id, "your-upi-id@oksbi");
        assert!(config.simulated_latency.is_zero());
        assert!(config.recommendations.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = StorefrontConfig {
            recommendations: Some(RecommendationConfig {
                api_key: SecretString::from("AIza-very-secret"),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            }),
            ..StorefrontConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("AIza-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_store_options_carry_credentials() {
        let options = StorefrontConfig::default().store_options();
        assert_eq!(options.operator_username, "admin");
        assert!(options.operator_secret.matches("password"));
        assert!(options.seed_secret.matches("password"));
    }
}
