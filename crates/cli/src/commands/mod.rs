//! Command implementations.

pub mod catalog;
pub mod orders;
pub mod recommend;
pub mod seed;
pub mod simulate;

use std::path::Path;

use secrecy::ExposeSecret;
use thiserror::Error;

use flipmart_storefront::config::{ConfigError, StorefrontConfig};
use flipmart_storefront::seed::SeedError;
use flipmart_storefront::{AppError, Store};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Seed dataset could not be loaded.
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    /// A store operation was refused.
    #[error("{}", .0.user_message())]
    App(#[from] AppError),

    /// A command-line value could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Build the in-memory store for one command run.
///
/// # Errors
///
/// Returns `CliError::Seed` if the seed cannot be read or is inconsistent.
pub fn load_store(config: &StorefrontConfig, seed_path: Option<&Path>) -> Result<Store, CliError> {
    Ok(Store::from_config(config, seed_path)?)
}

/// Sign in as the configured operator.
///
/// # Errors
///
/// Returns `CliError::App` if the configured credential pair is rejected.
pub async fn operator_session(store: &Store, config: &StorefrontConfig) -> Result<(), CliError> {
    store
        .accounts()
        .operator_login(
            &config.operator.username,
            config.operator.secret.expose_secret(),
        )
        .await
        .map_err(AppError::from)?;
    Ok(())
}

/// Parse a numeric ID argument.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for anything but an integer.
pub fn parse_id(value: &str) -> Result<i64, CliError> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("not a numeric ID: {value}")))
}
