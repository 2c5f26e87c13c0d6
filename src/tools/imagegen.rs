//! Image generation with Fireworks AI, pinned to IPFS through Pinata
//!
//! `generate_image` runs two calls in sequence: the image is generated first
//! and only a fully received image is uploaded. If pinning fails the image is
//! dropped; nothing is retried or rolled back.

use crate::tools::context::ToolContext;
use crate::tools::http;
use crate::tools::ipfs::{PinataApi, PINATA_API_URL, PINATA_GATEWAY_URL};
use crate::tools::registry::{Tool, ToolCollection};
use crate::tools::schema::{parse_args, Field, ParamSchema};
use crate::types::{AppError, Result};
use crate::utils::config::{require_credential, CredentialKey};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub const FIREWORKS_FLUX_URL: &str = "https://api.fireworks.ai/inference/v1/workflows/accounts/fireworks/models/flux-1-schnell-fp8/text_to_image";

const PROVIDER: &str = "Fireworks AI";

const ASPECT_RATIOS: &[&str] = &["1:1", "16:9", "9:16", "4:3", "3:4", "21:9", "9:21"];

/// Endpoints used by the image pipeline.
#[derive(Debug, Clone)]
pub struct ImageGenEndpoints {
    pub fireworks_url: String,
    pub pinata_url: String,
    pub gateway_url: String,
}

impl Default for ImageGenEndpoints {
    fn default() -> Self {
        Self {
            fireworks_url: FIREWORKS_FLUX_URL.to_string(),
            pinata_url: PINATA_API_URL.to_string(),
            gateway_url: PINATA_GATEWAY_URL.to_string(),
        }
    }
}

pub fn imagegen_tools(
    fireworks_api_key: Option<&str>,
    pinata_jwt: Option<&str>,
) -> Result<ToolCollection> {
    imagegen_tools_at(ImageGenEndpoints::default(), fireworks_api_key, pinata_jwt)
}

pub fn imagegen_tools_at(
    endpoints: ImageGenEndpoints,
    fireworks_api_key: Option<&str>,
    pinata_jwt: Option<&str>,
) -> Result<ToolCollection> {
    let api_key = require_credential(CredentialKey::FireworksApiKey, fireworks_api_key)?;
    let pinata = PinataApi::at(&endpoints.pinata_url, &endpoints.gateway_url, pinata_jwt)?;

    Ok(vec![Arc::new(GenerateImageTool::new(
        endpoints.fireworks_url,
        api_key,
        pinata,
    ))])
}

struct GenerateImageTool {
    url: String,
    api_key: String,
    pinata: PinataApi,
    params: ParamSchema,
}

#[derive(Deserialize)]
struct GenerateImageArgs {
    prompt: String,
    #[serde(default = "default_aspect_ratio")]
    aspect_ratio: String,
    #[serde(default = "default_steps")]
    steps: u32,
    seed: Option<u64>,
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

fn default_steps() -> u32 {
    4
}

impl GenerateImageTool {
    fn new(url: String, api_key: String, pinata: PinataApi) -> Self {
        Self {
            url,
            api_key,
            pinata,
            params: ParamSchema::new(vec![
                Field::string("prompt", "Description of the image to generate").required(),
                Field::string("aspect_ratio", "Output aspect ratio")
                    .one_of(ASPECT_RATIOS)
                    .default_value(json!("1:1")),
                Field::integer("steps", "Number of inference steps")
                    .range(1.0, 8.0)
                    .default_value(json!(4)),
                Field::integer("seed", "Seed for reproducible output").min(0.0),
            ]),
        }
    }

    async fn generate(&self, ctx: &ToolContext, args: &GenerateImageArgs) -> Result<Vec<u8>> {
        let mut body = json!({
            "prompt": args.prompt,
            "aspect_ratio": args.aspect_ratio,
            "guidance_scale": 3.5,
            "num_inference_steps": args.steps,
        });
        if let Some(seed) = args.seed {
            body["seed"] = json!(seed);
        }

        let request = ctx
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("Accept", "image/jpeg")
            .json(&body);
        let body = http::send_bytes(PROVIDER, request).await?;
        if body.bytes.is_empty() {
            return Err(AppError::Parse(format!("{} returned an empty image", PROVIDER)));
        }
        if !is_image(body.content_type.as_deref(), &body.bytes) {
            return Err(AppError::Parse(format!(
                "{} returned {} instead of an image",
                PROVIDER,
                body.content_type.as_deref().unwrap_or("an untyped body")
            )));
        }
        Ok(body.bytes)
    }
}

const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

/// An `image/*` content type or a JPEG signature counts as an image.
fn is_image(content_type: Option<&str>, bytes: &[u8]) -> bool {
    let typed = content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false);
    typed || bytes.starts_with(&JPEG_MAGIC)
}

#[async_trait]
impl Tool for GenerateImageTool {
    fn name(&self) -> &str {
        "generate_image"
    }

    fn description(&self) -> &str {
        "Generate an image from a text prompt with Fireworks AI and pin it to IPFS"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: GenerateImageArgs = parse_args(args)?;

        let image = self.generate(ctx, &args).await?;
        info!(bytes = image.len(), "Generated image");

        let file_name = format!("toolbelt-{}.jpg", Utc::now().format("%Y%m%dT%H%M%S%.3f"));
        let pinned = self
            .pinata
            .pin_file(&ctx.http, image, &file_name, "image/jpeg")
            .await?;

        let mut result = self.pinata.describe(&pinned);
        result["prompt"] = json!(args.prompt);
        result["aspectRatio"] = json!(args.aspect_ratio);
        result["fileName"] = json!(file_name);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_both_credentials() {
        assert!(matches!(
            imagegen_tools(None, Some("jwt")),
            Err(AppError::Configuration(ref m)) if m.contains("FIREWORKS_API_KEY")
        ));
        assert!(matches!(
            imagegen_tools(Some("fw"), None),
            Err(AppError::Configuration(ref m)) if m.contains("PINATA_JWT")
        ));
        assert_eq!(imagegen_tools(Some("fw"), Some("jwt")).unwrap().len(), 1);
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Some("image/jpeg"), b"anything"));
        assert!(is_image(Some("Image/PNG"), b"\x89PNG"));
        assert!(is_image(Some("application/octet-stream"), &[0xFF, 0xD8, 0xFF]));
        assert!(is_image(None, &[0xFF, 0xD8]));
        assert!(!is_image(Some("application/json"), br#"{"error":"content filtered"}"#));
        assert!(!is_image(None, b"<html></html>"));
    }
}
