//! Request helpers shared by the provider wrappers.
//!
//! Every wrapper funnels its outbound call through [`send_json`] or
//! [`send_bytes`] so status and decoding failures map to the same
//! [`AppError`] variants everywhere.

use crate::types::{AppError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

const MAX_DETAIL_LEN: usize = 500;

/// Send the request and decode a JSON body.
pub async fn send_json(provider: &str, request: RequestBuilder) -> Result<Value> {
    let response = send(provider, request).await?;
    let text = response
        .text()
        .await
        .map_err(|e| AppError::Network(format!("{} response body: {}", provider, e)))?;

    serde_json::from_str(&text)
        .map_err(|e| AppError::Parse(format!("{} returned invalid JSON: {}", provider, e)))
}

/// A raw response body with its declared content type.
#[derive(Debug)]
pub struct BinaryBody {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Send the request and return the raw body bytes.
pub async fn send_bytes(provider: &str, request: RequestBuilder) -> Result<BinaryBody> {
    let response = send(provider, request).await?;
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Network(format!("{} response body: {}", provider, e)))?;
    Ok(BinaryBody {
        content_type,
        bytes: bytes.to_vec(),
    })
}

/// Send the request and return the body as text.
pub async fn send_text(provider: &str, request: RequestBuilder) -> Result<String> {
    let response = send(provider, request).await?;
    response
        .text()
        .await
        .map_err(|e| AppError::Network(format!("{} response body: {}", provider, e)))
}

async fn send(provider: &str, request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| AppError::Network(format!("{} request failed: {}", provider, e)))?;

    let status = response.status();
    debug!(provider, status = status.as_u16(), url = %response.url(), "Upstream response");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Provider {
            provider: provider.to_string(),
            status: status.as_u16(),
            detail: error_detail(&body, status.canonical_reason()),
        });
    }

    Ok(response)
}

/// Pull a readable message out of an error body.
///
/// Prefers `error`, `message` or `detail` fields of a JSON body, falls back to
/// the raw text (truncated), then to the status reason.
pub fn error_detail(body: &str, reason: Option<&str>) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message", "detail"] {
            match json.get(key) {
                Some(Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(s)) = inner.get("message").or(inner.get("reason")) {
                        return s.clone();
                    }
                }
                _ => {}
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return reason.unwrap_or("no response body").to_string();
    }
    trimmed.chars().take(MAX_DETAIL_LEN).collect()
}

/// Look up a JSON pointer, failing with a parse error naming the provider.
pub fn require<'a>(provider: &str, value: &'a Value, pointer: &str) -> Result<&'a Value> {
    value.pointer(pointer).ok_or_else(|| {
        AppError::Parse(format!(
            "{} response is missing '{}'",
            provider,
            pointer.trim_start_matches('/')
        ))
    })
}

/// Like [`require`] but also demands an array.
pub fn require_array<'a>(provider: &str, value: &'a Value, pointer: &str) -> Result<&'a Vec<Value>> {
    require(provider, value, pointer)?.as_array().ok_or_else(|| {
        AppError::Parse(format!(
            "{} response field '{}' is not an array",
            provider,
            pointer.trim_start_matches('/')
        ))
    })
}

/// Trim a configured base URL so paths can be appended with `format!`.
pub fn base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
