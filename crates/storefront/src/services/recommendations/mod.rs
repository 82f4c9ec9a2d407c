//! Advisory "you may also like" suggestions for a product page.
//!
//! Suggestions come from a [`RecommendationSource`] and are cached per
//! product for five minutes. The product page never fails because of this
//! collaborator: a missing API key or any source error yields the fixed
//! [`fallback_recommendations`].

mod client;
mod error;

pub use client::GeminiClient;
pub use error::RecommendationError;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use flipmart_core::ProductId;

use crate::config::RecommendationConfig;
use crate::models::Product;

/// Suggestions shown per product.
pub const MAX_RECOMMENDATIONS: usize = 3;

const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_CAPACITY: u64 = 1000;

/// One suggested product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub reason: String,
}

/// Something that can suggest complementary products.
pub trait RecommendationSource: Send + Sync {
    /// Suggest products that go with `product`.
    fn recommend(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<Vec<Recommendation>, RecommendationError>> + Send;
}

/// Fixed suggestions served when the source is unavailable.
#[must_use]
pub fn fallback_recommendations() -> Vec<Recommendation> {
    [
        (
            "Smart Watch",
            "Pairs well with your new phone for fitness tracking.",
        ),
        ("Wireless Earbuds", "Enjoy high-quality audio on the go."),
        (
            "Protective Case",
            "Keep your new device safe from drops and scratches.",
        ),
    ]
    .into_iter()
    .map(|(name, reason)| Recommendation {
        name: name.to_string(),
        reason: reason.to_string(),
    })
    .collect()
}

/// Cached recommendations with a static fallback.
pub struct RecommendationService<S> {
    source: Option<S>,
    cache: Cache<ProductId, Arc<Vec<Recommendation>>>,
}

impl RecommendationService<GeminiClient> {
    /// Service backed by Gemini, or fallback-only when no key is configured.
    #[must_use]
    pub fn from_config(config: Option<&RecommendationConfig>) -> Self {
        if config.is_none() {
            warn!("Gemini API key not configured; serving static recommendations");
        }
        Self::new(config.map(GeminiClient::new))
    }
}

impl<S: RecommendationSource> RecommendationService<S> {
    /// Service over `source`; `None` always serves the fallback.
    #[must_use]
    pub fn new(source: Option<S>) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        Self { source, cache }
    }

    /// Up to [`MAX_RECOMMENDATIONS`] suggestions for `product`.
    ///
    /// Only answers from the source are cached, so a failed lookup is retried
    /// on the next call.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn recommend(&self, product: &Product) -> Vec<Recommendation> {
        let Some(source) = &self.source else {
            return fallback_recommendations();
        };

        if let Some(cached) = self.cache.get(&product.id).await {
            debug!("Recommendations served from cache");
            return cached.as_ref().clone();
        }

        match source.recommend(product).await {
            Ok(mut recommendations) => {
                recommendations.truncate(MAX_RECOMMENDATIONS);
                self.cache
                    .insert(product.id, Arc::new(recommendations.clone()))
                    .await;
                recommendations
            }
            Err(e) => {
                warn!(error = %e, "Recommendation source failed; serving fallback");
                fallback_recommendations()
            }
        }
    }

    /// Drop the cached suggestions for one product.
    pub async fn invalidate(&self, product_id: ProductId) {
        self.cache.invalidate(&product_id).await;
    }
}
