//! Embedding provider implementations.
//!
//! Concrete backends behind the core [`EmbeddingProvider`] trait:
//! - **[`GeminiProvider`]** — calls the Gemini `embedContent` endpoint
//!   (the corpus was embedded with `text-embedding-004`, 768 dims).
//! - **[`OpenAiProvider`]** — calls the OpenAI embeddings API.
//! - **[`DisabledProvider`]** — always fails; keyword-only operation.
//!
//! # Retry Strategy
//!
//! Transient failures (HTTP 429, 5xx, network errors) retry with
//! exponential backoff: 1s, 2s, 4s, … capped at 2^5. Authentication
//! failures surface immediately as configuration errors — retrying cannot
//! fix a bad key. Exhausted retries degrade to
//! [`EngineError::EmbeddingUnavailable`], which callers absorb by falling
//! back to keyword-only retrieval.

use std::time::Duration;

use cutwise_core::embedding::EmbeddingProvider;
use cutwise_core::error::EngineError;

use crate::config::EmbeddingConfig;

/// A no-op provider used when `embedding.provider = "disabled"`.
pub struct DisabledProvider;

impl EmbeddingProvider for DisabledProvider {
    fn model_name(&self) -> &str {
        "disabled"
    }
    fn dims(&self) -> usize {
        0
    }
}

/// Embedding provider for the Gemini API.
///
/// Requires the `GEMINI_API_KEY` environment variable.
pub struct GeminiProvider {
    model: String,
    dims: usize,
}

impl GeminiProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EngineError> {
        let model = require_model(config)?;
        let dims = require_dims(config)?;
        if std::env::var("GEMINI_API_KEY").is_err() {
            return Err(EngineError::Configuration(
                "GEMINI_API_KEY environment variable not set".to_string(),
            ));
        }
        Ok(Self { model, dims })
    }
}

impl EmbeddingProvider for GeminiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }
    fn dims(&self) -> usize {
        self.dims
    }
}

/// Embedding provider for the OpenAI API.
///
/// Requires the `OPENAI_API_KEY` environment variable.
pub struct OpenAiProvider {
    model: String,
    dims: usize,
}

impl OpenAiProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EngineError> {
        let model = require_model(config)?;
        let dims = require_dims(config)?;
        if std::env::var("OPENAI_API_KEY").is_err() {
            return Err(EngineError::Configuration(
                "OPENAI_API_KEY environment variable not set".to_string(),
            ));
        }
        Ok(Self { model, dims })
    }
}

impl EmbeddingProvider for OpenAiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }
    fn dims(&self) -> usize {
        self.dims
    }
}

fn require_model(config: &EmbeddingConfig) -> Result<String, EngineError> {
    config.model.clone().ok_or_else(|| {
        EngineError::Configuration(format!(
            "embedding.model required for provider '{}'",
            config.provider
        ))
    })
}

fn require_dims(config: &EmbeddingConfig) -> Result<usize, EngineError> {
    config.dims.ok_or_else(|| {
        EngineError::Configuration(format!(
            "embedding.dims required for provider '{}'",
            config.provider
        ))
    })
}

/// Create the provider named by the configuration.
pub fn create_provider(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>, EngineError> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledProvider)),
        "gemini" => Ok(Box::new(GeminiProvider::new(config)?)),
        "openai" => Ok(Box::new(OpenAiProvider::new(config)?)),
        other => Err(EngineError::Configuration(format!(
            "Unknown embedding provider: {other}"
        ))),
    }
}

/// Embed a single query text using the configured provider.
pub async fn embed_query(config: &EmbeddingConfig, text: &str) -> Result<Vec<f32>, EngineError> {
    match config.provider.as_str() {
        "gemini" => embed_gemini(config, text).await,
        "openai" => embed_openai(config, text).await,
        "disabled" => Err(EngineError::EmbeddingUnavailable(
            "embedding provider is disabled".to_string(),
        )),
        other => Err(EngineError::Configuration(format!(
            "Unknown embedding provider: {other}"
        ))),
    }
}

async fn embed_gemini(config: &EmbeddingConfig, text: &str) -> Result<Vec<f32>, EngineError> {
    let api_key = std::env::var("GEMINI_API_KEY")
        .map_err(|_| EngineError::Configuration("GEMINI_API_KEY not set".to_string()))?;
    let model = config
        .model
        .as_deref()
        .ok_or_else(|| EngineError::Configuration("embedding.model required".to_string()))?;

    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{model}:embedContent?key={api_key}"
    );
    let body = serde_json::json!({
        "model": format!("models/{model}"),
        "content": { "parts": [{ "text": text }] }
    });

    let json = post_with_retry(config, &url, None, &body, "Gemini").await?;
    parse_gemini_response(&json)
}

/// Extract `embedding.values` from a Gemini `embedContent` response.
fn parse_gemini_response(json: &serde_json::Value) -> Result<Vec<f32>, EngineError> {
    let values = json
        .get("embedding")
        .and_then(|e| e.get("values"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            EngineError::EmbeddingUnavailable(
                "Invalid Gemini response: missing embedding.values".to_string(),
            )
        })?;

    Ok(values
        .iter()
        .map(|v| v.as_f64().unwrap_or(0.0) as f32)
        .collect())
}

async fn embed_openai(config: &EmbeddingConfig, text: &str) -> Result<Vec<f32>, EngineError> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| EngineError::Configuration("OPENAI_API_KEY not set".to_string()))?;
    let model = config
        .model
        .as_deref()
        .ok_or_else(|| EngineError::Configuration("embedding.model required".to_string()))?;

    let body = serde_json::json!({
        "model": model,
        "input": [text],
    });

    let json = post_with_retry(
        config,
        "https://api.openai.com/v1/embeddings",
        Some(&api_key),
        &body,
        "OpenAI",
    )
    .await?;
    parse_openai_response(&json)
}

/// Extract the first `data[].embedding` from an OpenAI embeddings response.
fn parse_openai_response(json: &serde_json::Value) -> Result<Vec<f32>, EngineError> {
    let embedding = json
        .get("data")
        .and_then(|d| d.as_array())
        .and_then(|d| d.first())
        .and_then(|item| item.get("embedding"))
        .and_then(|e| e.as_array())
        .ok_or_else(|| {
            EngineError::EmbeddingUnavailable(
                "Invalid OpenAI response: missing data[0].embedding".to_string(),
            )
        })?;

    Ok(embedding
        .iter()
        .map(|v| v.as_f64().unwrap_or(0.0) as f32)
        .collect())
}

/// POST a JSON body with exponential backoff on transient failures.
///
/// 429 and 5xx retry; 401/403 surface as configuration errors; other 4xx
/// and exhausted retries surface as `EmbeddingUnavailable`.
async fn post_with_retry(
    config: &EmbeddingConfig,
    url: &str,
    bearer: Option<&str>,
    body: &serde_json::Value,
    vendor: &str,
) -> Result<serde_json::Value, EngineError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| EngineError::Configuration(format!("HTTP client build failed: {e}")))?;

    let mut last_err: Option<EngineError> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tokio::time::sleep(delay).await;
        }

        let mut request = client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return response.json().await.map_err(|e| {
                        EngineError::EmbeddingUnavailable(format!(
                            "{vendor} returned malformed JSON: {e}"
                        ))
                    });
                }

                if status.as_u16() == 401 || status.as_u16() == 403 {
                    let text = response.text().await.unwrap_or_default();
                    return Err(EngineError::Configuration(format!(
                        "{vendor} rejected credentials ({status}): {text}"
                    )));
                }

                if status.as_u16() == 429 || status.is_server_error() {
                    let text = response.text().await.unwrap_or_default();
                    last_err = Some(EngineError::EmbeddingUnavailable(format!(
                        "{vendor} API error {status}: {text}"
                    )));
                    continue;
                }

                let text = response.text().await.unwrap_or_default();
                return Err(EngineError::EmbeddingUnavailable(format!(
                    "{vendor} API error {status}: {text}"
                )));
            }
            Err(e) => {
                last_err = Some(EngineError::EmbeddingUnavailable(format!(
                    "{vendor} connection error: {e}"
                )));
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        EngineError::EmbeddingUnavailable(format!("{vendor} embedding failed after retries"))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gemini_response() {
        let json = serde_json::json!({
            "embedding": { "values": [0.1, -0.25, 0.5] }
        });
        let vec = parse_gemini_response(&json).unwrap();
        assert_eq!(vec.len(), 3);
        assert!((vec[1] + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_parse_gemini_response_missing_field() {
        let json = serde_json::json!({ "unexpected": true });
        assert!(matches!(
            parse_gemini_response(&json),
            Err(EngineError::EmbeddingUnavailable(_))
        ));
    }

    #[test]
    fn test_parse_openai_response() {
        let json = serde_json::json!({
            "data": [ { "embedding": [1.0, 2.0] } ]
        });
        let vec = parse_openai_response(&json).unwrap();
        assert_eq!(vec, vec![1.0, 2.0]);
    }

    #[test]
    fn test_parse_openai_response_empty_data() {
        let json = serde_json::json!({ "data": [] });
        assert!(parse_openai_response(&json).is_err());
    }

    #[test]
    fn test_create_provider_disabled() {
        let config = EmbeddingConfig::default();
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "disabled");
        assert_eq!(provider.dims(), 0);
    }

    #[test]
    fn test_create_provider_unknown() {
        let config = EmbeddingConfig {
            provider: "mystery".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(EngineError::Configuration(_))
        ));
    }
}
