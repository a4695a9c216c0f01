//! Generation client for the final recipe text.
//!
//! Calls the OpenAI chat completions API with a per-language system
//! instruction pinning the output language. The upstream may answer with
//! one JSON body or with an SSE stream of incremental fragments; both
//! shapes are consumed behind the same [`generate`] call, which returns
//! the full accumulated text.
//!
//! Generation failures are not retried: the generated text is the end
//! product, so there is no degraded mode to fall back to — the error is
//! surfaced to the caller as [`EngineError::Generation`].

use std::time::Duration;

use cutwise_core::error::EngineError;
use cutwise_core::models::Language;
use cutwise_core::terms::terms;

use crate::config::GenerationConfig;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Generate recipe text from an assembled prompt.
pub async fn generate(
    config: &GenerationConfig,
    prompt: &str,
    language: Language,
) -> Result<String, EngineError> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| EngineError::Configuration("OPENAI_API_KEY not set".to_string()))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| EngineError::Configuration(format!("HTTP client build failed: {e}")))?;

    let body = serde_json::json!({
        "model": config.model,
        "messages": [
            { "role": "system", "content": terms(language).system_instruction },
            { "role": "user", "content": prompt }
        ],
        "temperature": config.temperature,
        "max_tokens": config.max_tokens,
        "stream": config.stream,
    });

    let response = client
        .post(CHAT_COMPLETIONS_URL)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&body)
        .send()
        .await
        .map_err(|e| EngineError::Generation(format!("generation request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(EngineError::Configuration(format!(
                "generation API rejected credentials ({status}): {text}"
            )));
        }
        return Err(EngineError::Generation(format!(
            "generation API error {status}: {text}"
        )));
    }

    if config.stream {
        consume_stream(response).await
    } else {
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EngineError::Generation(format!("malformed generation response: {e}")))?;
        parse_completion(&json)
    }
}

/// Extract `choices[0].message.content` from an atomic completion response.
fn parse_completion(json: &serde_json::Value) -> Result<String, EngineError> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            EngineError::Generation("generation response carried no content".to_string())
        })
}

/// Accumulate an SSE stream of completion fragments into the full text.
///
/// Fragments arrive as `data: {json}` lines carrying
/// `choices[0].delta.content`; the stream ends at the `data: [DONE]`
/// marker (or when the connection closes).
async fn consume_stream(mut response: reqwest::Response) -> Result<String, EngineError> {
    let mut text = String::new();
    let mut buffer = String::new();

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| EngineError::Generation(format!("generation stream failed: {e}")))?
    {
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        // Process every complete line; keep the partial tail in the buffer.
        while let Some(newline) = buffer.find('\n') {
            let line = buffer[..newline].to_string();
            buffer.drain(..=newline);

            match parse_sse_line(&line) {
                Some(Some(fragment)) => text.push_str(&fragment),
                Some(None) => return Ok(text),
                None => {}
            }
        }
    }

    if text.is_empty() {
        return Err(EngineError::Generation(
            "generation stream ended without content".to_string(),
        ));
    }
    Ok(text)
}

/// Parse a single SSE line, returning the content fragment it carries,
/// `None` for non-data lines, or `Some(None)` at the end marker.
fn parse_sse_line(line: &str) -> Option<Option<String>> {
    let payload = line.trim().strip_prefix("data: ")?;
    if payload == "[DONE]" {
        return Some(None);
    }
    let json: serde_json::Value = serde_json::from_str(payload).ok()?;
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| Some(s.to_string()))
}
