//! "You may also like" lookups.
//!
//! Uses Gemini when `GEMINI_API_KEY` is set, otherwise the static list.
//!
//! # Usage
//!
//! ```bash
//! fm-cli recommend 201
//! ```

use tracing::info;

use flipmart_core::ProductId;
use flipmart_storefront::config::StorefrontConfig;
use flipmart_storefront::services::recommendations::RecommendationService;
use flipmart_storefront::{AppError, Store};

use super::{CliError, parse_id};

/// Log up to three suggestions for one product.
///
/// # Errors
///
/// Returns `CliError::App` if the product does not exist.
pub async fn recommend(
    store: &Store,
    config: &StorefrontConfig,
    product_id: &str,
) -> Result<(), CliError> {
    let id = ProductId::new(parse_id(product_id)?);
    let product = store.catalog().product(id).await.map_err(AppError::from)?;

    let service = RecommendationService::from_config(config.recommendations.as_ref());
    let recommendations = service.recommend(&product).await;

    info!("You may also like (for {}):", product.name);
    for recommendation in recommendations {
        info!("  {} - {}", recommendation.name, recommendation.reason);
    }
    Ok(())
}
