//! Seed dataset inspection.
//!
//! # Usage
//!
//! ```bash
//! # Validate a seed file
//! fm-cli seed check data/store.yaml
//!
//! # Write the demo dataset as YAML (or JSON) to stdout
//! fm-cli seed dump --format yaml > data/store.yaml
//! ```

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use clap::ValueEnum;
use tracing::{error, info};

use flipmart_core::OrderStatus;
use flipmart_storefront::seed::Seed;

use super::CliError;

/// Output format for `seed dump`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeedFormat {
    Json,
    Yaml,
}

/// Parse and validate a seed file, logging a summary.
///
/// # Errors
///
/// Returns `CliError::Seed` if the file cannot be parsed or fails validation.
pub fn check(path: &Path) -> Result<(), CliError> {
    info!(path = %path.display(), "Checking seed file");

    let seed = Seed::from_path(path)?;
    if let Err(e) = seed.validate() {
        error!("Seed validation failed: {e}");
        return Err(e.into());
    }

    let pending = seed
        .orders
        .iter()
        .filter(|o| o.status == OrderStatus::PendingConfirmation)
        .count();
    let without_secret = seed.users.iter().filter(|u| u.secret.is_none()).count();

    info!("Seed is valid");
    info!("  Users: {} ({without_secret} using the default secret)", seed.users.len());
    info!("  Categories: {}", seed.categories.len());
    info!("  Products: {}", seed.products.len());
    info!("  Orders: {} ({pending} awaiting confirmation)", seed.orders.len());
    Ok(())
}

/// Write the demo dataset to stdout.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn dump(format: SeedFormat) -> Result<(), CliError> {
    let seed = Seed::demo(Utc::now())?;
    let rendered = match format {
        SeedFormat::Json => serde_json::to_string_pretty(&seed)?,
        SeedFormat::Yaml => serde_yaml::to_string(&seed)?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
