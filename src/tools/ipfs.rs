//! IPFS pinning through Pinata
//!
//! [`PinataApi`] is shared with the image generation pipeline, which pins the
//! generated file; the `ipfs` collection itself exposes JSON pinning.

use crate::tools::context::ToolContext;
use crate::tools::http::{self, require};
use crate::tools::registry::{Tool, ToolCollection};
use crate::tools::schema::{parse_args, Field, ParamSchema};
use crate::types::{AppError, Result};
use crate::utils::config::{require_credential, CredentialKey};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub const PINATA_API_URL: &str = "https://api.pinata.cloud";
pub const PINATA_GATEWAY_URL: &str = "https://gateway.pinata.cloud/ipfs";

const PROVIDER: &str = "Pinata";

/// Result of a successful pin.
#[derive(Debug, Clone, PartialEq)]
pub struct PinnedContent {
    pub cid: String,
    pub size: Option<u64>,
    pub timestamp: Option<String>,
}

/// Thin client for the Pinata pinning endpoints.
#[derive(Debug, Clone)]
pub struct PinataApi {
    base_url: String,
    gateway_url: String,
    jwt: String,
}

impl PinataApi {
    pub fn new(jwt: Option<&str>) -> Result<Self> {
        Self::at(PINATA_API_URL, PINATA_GATEWAY_URL, jwt)
    }

    pub fn at(base_url: &str, gateway_url: &str, jwt: Option<&str>) -> Result<Self> {
        Ok(Self {
            base_url: http::base_url(base_url),
            gateway_url: http::base_url(gateway_url),
            jwt: require_credential(CredentialKey::PinataJwt, jwt)?,
        })
    }

    pub fn gateway_link(&self, cid: &str) -> String {
        format!("{}/{}", self.gateway_url, cid)
    }

    /// Upload raw bytes with `pinFileToIPFS`.
    pub async fn pin_file(
        &self,
        http_client: &reqwest::Client,
        bytes: Vec<u8>,
        file_name: &str,
        mime: &str,
    ) -> Result<PinnedContent> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| AppError::InvalidArgument(format!("invalid mime type {}: {}", mime, e)))?;
        let form = Form::new()
            .part("file", part)
            .text("pinataMetadata", json!({ "name": file_name }).to_string());

        let request = http_client
            .post(format!("{}/pinning/pinFileToIPFS", self.base_url))
            .bearer_auth(&self.jwt)
            .multipart(form);
        let body = http::send_json(PROVIDER, request).await?;
        let pinned = Self::parse_pin(&body)?;
        info!(cid = %pinned.cid, file = file_name, "Pinned file to IPFS");
        Ok(pinned)
    }

    /// Pin a JSON document with `pinJSONToIPFS`.
    pub async fn pin_json(
        &self,
        http_client: &reqwest::Client,
        content: Value,
        name: Option<&str>,
    ) -> Result<PinnedContent> {
        let mut payload = json!({ "pinataContent": content });
        if let Some(name) = name {
            payload["pinataMetadata"] = json!({ "name": name });
        }

        let request = http_client
            .post(format!("{}/pinning/pinJSONToIPFS", self.base_url))
            .bearer_auth(&self.jwt)
            .json(&payload);
        let body = http::send_json(PROVIDER, request).await?;
        let pinned = Self::parse_pin(&body)?;
        info!(cid = %pinned.cid, "Pinned JSON to IPFS");
        Ok(pinned)
    }

    fn parse_pin(body: &Value) -> Result<PinnedContent> {
        let cid = require(PROVIDER, body, "/IpfsHash")?
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Parse(format!("{} returned an empty IpfsHash", PROVIDER)))?;

        Ok(PinnedContent {
            cid: cid.to_string(),
            size: body.get("PinSize").and_then(Value::as_u64),
            timestamp: body
                .get("Timestamp")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    pub fn describe(&self, pinned: &PinnedContent) -> Value {
        json!({
            "cid": pinned.cid,
            "ipfsUri": format!("ipfs://{}", pinned.cid),
            "gatewayUrl": self.gateway_link(&pinned.cid),
            "size": pinned.size,
            "timestamp": pinned.timestamp,
        })
    }
}

pub fn ipfs_tools(pinata_jwt: Option<&str>) -> Result<ToolCollection> {
    ipfs_tools_at(PINATA_API_URL, PINATA_GATEWAY_URL, pinata_jwt)
}

pub fn ipfs_tools_at(
    base_url: &str,
    gateway_url: &str,
    pinata_jwt: Option<&str>,
) -> Result<ToolCollection> {
    let api = Arc::new(PinataApi::at(base_url, gateway_url, pinata_jwt)?);
    Ok(vec![Arc::new(PinJsonTool::new(api))])
}

struct PinJsonTool {
    api: Arc<PinataApi>,
    params: ParamSchema,
}

#[derive(Deserialize)]
struct PinJsonArgs {
    content: Value,
    name: Option<String>,
}

impl PinJsonTool {
    fn new(api: Arc<PinataApi>) -> Self {
        Self {
            api,
            params: ParamSchema::new(vec![
                Field::object("content", "JSON object to pin").required(),
                Field::string("name", "Human-readable name stored as pin metadata"),
            ]),
        }
    }
}

#[async_trait]
impl Tool for PinJsonTool {
    fn name(&self) -> &str {
        "pin_json_to_ipfs"
    }

    fn description(&self) -> &str {
        "Pin a JSON document to IPFS via Pinata and return its content identifier"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: PinJsonArgs = parse_args(args)?;
        let pinned = self
            .api
            .pin_json(&ctx.http, args.content, args.name.as_deref())
            .await?;
        Ok(self.api.describe(&pinned))
    }
}
