//! CoinMarketCal market events calendar.

use crate::tools::context::ToolContext;
use crate::tools::http::{self, require_array};
use crate::tools::registry::{Tool, ToolCollection};
use crate::tools::schema::{parse_args, Field, ParamSchema};
use crate::types::{AppError, Result};
use crate::utils::config::{require_credential, CredentialKey};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const COINMARKETCAL_API_URL: &str = "https://developers.coinmarketcal.com/v1";

const PROVIDER: &str = "CoinMarketCal";

pub fn calendar_tools(api_key: Option<&str>) -> Result<ToolCollection> {
    calendar_tools_at(COINMARKETCAL_API_URL, api_key)
}

pub fn calendar_tools_at(base_url: &str, api_key: Option<&str>) -> Result<ToolCollection> {
    let api_key = require_credential(CredentialKey::CoinmarketcalApiKey, api_key)?;
    Ok(vec![Arc::new(EventsTool::new(base_url, api_key))])
}

struct EventsTool {
    base_url: String,
    api_key: String,
    params: ParamSchema,
}

#[derive(Deserialize)]
struct EventsArgs {
    #[serde(default)]
    coins: Vec<String>,
    date_range_start: Option<String>,
    date_range_end: Option<String>,
    #[serde(default = "default_max")]
    max: u32,
    sort_by: Option<String>,
}

fn default_max() -> u32 {
    10
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::InvalidArgument(format!("parameter '{}' must be a YYYY-MM-DD date", name))
    })
}

impl EventsTool {
    fn new(base_url: &str, api_key: String) -> Self {
        Self {
            base_url: http::base_url(base_url),
            api_key,
            params: ParamSchema::new(vec![
                Field::string_array("coins", "CoinMarketCal coin ids to filter by, e.g. bitcoin"),
                Field::string("date_range_start", "Earliest event date (YYYY-MM-DD)"),
                Field::string("date_range_end", "Latest event date (YYYY-MM-DD)"),
                Field::integer("max", "Maximum number of events")
                    .range(1.0, 75.0)
                    .default_value(json!(10)),
                Field::string("sort_by", "Event ordering").one_of(&[
                    "created_desc",
                    "hot_events",
                    "trending_events",
                    "significant_events",
                ]),
            ]),
        }
    }

    fn simplify(event: &Value) -> Value {
        let title = event
            .pointer("/title/en")
            .or_else(|| event.get("title"))
            .cloned()
            .unwrap_or(Value::Null);
        let coins: Vec<Value> = event["coins"]
            .as_array()
            .map(|coins| coins.iter().map(|c| c["symbol"].clone()).collect())
            .unwrap_or_default();
        let categories: Vec<Value> = event["categories"]
            .as_array()
            .map(|cats| cats.iter().map(|c| c["name"].clone()).collect())
            .unwrap_or_default();

        json!({
            "id": event["id"],
            "title": title,
            "date": event["date_event"],
            "coins": coins,
            "categories": categories,
            "source": event["source"],
            "proof": event["proof"],
        })
    }
}

#[async_trait]
impl Tool for EventsTool {
    fn name(&self) -> &str {
        "coinmarketcal_get_events"
    }

    fn description(&self) -> &str {
        "Get upcoming crypto market events (listings, upgrades, unlocks) from CoinMarketCal"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: EventsArgs = parse_args(args)?;

        let start = args
            .date_range_start
            .as_deref()
            .map(|d| parse_date("date_range_start", d))
            .transpose()?;
        let end = args
            .date_range_end
            .as_deref()
            .map(|d| parse_date("date_range_end", d))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(AppError::InvalidArgument(
                    "date_range_end must not be before date_range_start".to_string(),
                ));
            }
        }

        let mut query: Vec<(&str, String)> = vec![("max", args.max.to_string())];
        if !args.coins.is_empty() {
            query.push(("coins", args.coins.join(",")));
        }
        if let Some(start) = start {
            query.push(("dateRangeStart", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = end {
            query.push(("dateRangeEnd", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(sort_by) = args.sort_by {
            query.push(("sortBy", sort_by));
        }

        let request = ctx
            .http
            .get(format!("{}/events", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("Accept", "application/json")
            .query(&query);
        let body = http::send_json(PROVIDER, request).await?;

        let events: Vec<Value> = require_array(PROVIDER, &body, "/body")?
            .iter()
            .map(Self::simplify)
            .collect();

        Ok(json!({ "count": events.len(), "events": events }))
    }
}
