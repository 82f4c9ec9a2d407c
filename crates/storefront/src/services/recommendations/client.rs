//! Gemini `generateContent` client.
//!
//! Asks the model for three complementary products as structured JSON.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, instrument};

use crate::config::RecommendationConfig;
use crate::models::Product;

use super::{Recommendation, RecommendationError, RecommendationSource};

/// Client for the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    url: String,
    api_key: SecretString,
}

impl GeminiClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &RecommendationConfig) -> Self {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            config.endpoint.trim_end_matches('/'),
            config.model
        );

        Self {
            inner: Arc::new(GeminiClientInner {
                client: reqwest::Client::new(),
                url,
                api_key: config.api_key.clone(),
            }),
        }
    }
}

impl RecommendationSource for GeminiClient {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn recommend(&self, product: &Product) -> Result<Vec<Recommendation>, RecommendationError> {
        let response = self
            .inner
            .client
            .post(&self.inner.url)
            .header("x-goog-api-key", self.inner.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request_body(product))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Gemini API returned non-success status"
            );
            return Err(RecommendationError::Api {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        let recommendations = parse_response(&response_text)?;
        debug!(count = recommendations.len(), "Received recommendations");
        Ok(recommendations)
    }
}

fn prompt(product: &Product) -> String {
    format!(
        "Based on the product \"{}\" which is described as \"{}\", suggest 3 complementary \
         products a customer might also be interested in. Do not suggest a similar product, \
         but something that enhances the experience of the original product.",
        product.name, product.description
    )
}

fn request_body(product: &Product) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt(product) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "recommendations": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "name": { "type": "STRING" },
                                "reason": { "type": "STRING" }
                            },
                            "required": ["name", "reason"]
                        }
                    }
                },
                "required": ["recommendations"]
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecommendationEnvelope {
    recommendations: Vec<Recommendation>,
}

/// Extract recommendations from a `generateContent` response body.
///
/// A response without text yields an empty list.
fn parse_response(body: &str) -> Result<Vec<Recommendation>, RecommendationError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let envelope: RecommendationEnvelope = serde_json::from_str(text)?;
    Ok(envelope.recommendations)
}
