//! Crypto Fear & Greed index from Alternative.me.

use crate::tools::context::ToolContext;
use crate::tools::http::{self, require_array};
use crate::tools::registry::{Tool, ToolCollection};
use crate::tools::schema::{parse_args, Field, ParamSchema};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const ALTERNATIVE_ME_URL: &str = "https://api.alternative.me";

const PROVIDER: &str = "Alternative.me";

pub fn sentiment_tools() -> Result<ToolCollection> {
    sentiment_tools_at(ALTERNATIVE_ME_URL)
}

pub fn sentiment_tools_at(base_url: &str) -> Result<ToolCollection> {
    Ok(vec![Arc::new(FearGreedTool::new(base_url))])
}

struct FearGreedTool {
    base_url: String,
    params: ParamSchema,
}

#[derive(Deserialize)]
struct FearGreedArgs {
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    1
}

/// Upstream encodes numbers as strings.
fn reading(entry: &Value) -> Result<Value> {
    let value: u32 = entry["value"]
        .as_str()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::Parse(format!("{} entry has no numeric 'value'", PROVIDER)))?;
    let timestamp: i64 = entry["timestamp"]
        .as_str()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::Parse(format!("{} entry has no 'timestamp'", PROVIDER)))?;
    let date = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| AppError::Parse(format!("{} timestamp out of range", PROVIDER)))?;

    Ok(json!({
        "value": value,
        "classification": entry["value_classification"],
        "timestamp": date.to_rfc3339(),
    }))
}

impl FearGreedTool {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: http::base_url(base_url),
            params: ParamSchema::new(vec![Field::integer(
                "limit",
                "Number of daily readings to return, newest first",
            )
            .range(1.0, 365.0)
            .default_value(json!(1))]),
        }
    }
}

#[async_trait]
impl Tool for FearGreedTool {
    fn name(&self) -> &str {
        "get_fear_greed_index"
    }

    fn description(&self) -> &str {
        "Get the Crypto Fear & Greed index (0 = extreme fear, 100 = extreme greed)"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: FearGreedArgs = parse_args(args)?;
        let request = ctx
            .http
            .get(format!("{}/fng/", self.base_url))
            .query(&[("limit", args.limit.to_string()), ("format", "json".to_string())]);
        let body = http::send_json(PROVIDER, request).await?;

        let readings = require_array(PROVIDER, &body, "/data")?
            .iter()
            .map(reading)
            .collect::<Result<Vec<Value>>>()?;

        let current = readings
            .first()
            .cloned()
            .ok_or_else(|| AppError::Parse(format!("{} returned no readings", PROVIDER)))?;

        Ok(json!({ "current": current, "history": readings }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_parses_string_fields() {
        let entry = json!({
            "value": "72",
            "value_classification": "Greed",
            "timestamp": "1700000000"
        });
        let parsed = reading(&entry).unwrap();
        assert_eq!(parsed["value"], 72);
        assert_eq!(parsed["classification"], "Greed");
        assert_eq!(parsed["timestamp"], "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_reading_rejects_missing_value() {
        let entry = json!({"timestamp": "1700000000"});
        assert!(matches!(reading(&entry), Err(AppError::Parse(_))));
    }
}
