//! CoinGecko price feed tools
//!
//! Wraps the public v3 API (`/simple/price`, `/search/trending`, `/search`)
//! using a demo API key.

use crate::tools::context::ToolContext;
use crate::tools::http::{self, require_array};
use crate::tools::registry::{Tool, ToolCollection};
use crate::tools::schema::{parse_args, Field, ParamSchema};
use crate::types::Result;
use crate::utils::config::{require_credential, CredentialKey};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

const PROVIDER: &str = "CoinGecko";

/// Common ticker symbols mapped to CoinGecko coin ids.
const SYMBOL_IDS: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("weth", "weth"),
    ("sol", "solana"),
    ("usdc", "usd-coin"),
    ("usdt", "tether"),
    ("dai", "dai"),
    ("bnb", "binancecoin"),
    ("matic", "matic-network"),
    ("pol", "polygon-ecosystem-token"),
    ("avax", "avalanche-2"),
    ("arb", "arbitrum"),
    ("op", "optimism"),
    ("doge", "dogecoin"),
    ("link", "chainlink"),
    ("uni", "uniswap"),
    ("aave", "aave"),
    ("xrp", "ripple"),
    ("ada", "cardano"),
    ("dot", "polkadot"),
    ("trx", "tron"),
    ("ton", "the-open-network"),
    ("ftm", "fantom"),
    ("mnt", "mantle"),
];

/// Map a ticker symbol to a CoinGecko id. Unknown input passes through lower-cased.
pub fn coingecko_id(token: &str) -> String {
    let token = token.trim().to_ascii_lowercase();
    SYMBOL_IDS
        .iter()
        .find(|(symbol, _)| *symbol == token)
        .map(|(_, id)| id.to_string())
        .unwrap_or(token)
}

struct CoinGeckoApi {
    base_url: String,
    api_key: String,
}

impl CoinGeckoApi {
    async fn get(&self, ctx: &ToolContext, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let request = ctx
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("x-cg-demo-api-key", &self.api_key)
            .query(query);
        http::send_json(PROVIDER, request).await
    }
}

/// Build the CoinGecko collection against the public API.
pub fn coingecko_tools(api_key: Option<&str>) -> Result<ToolCollection> {
    coingecko_tools_at(COINGECKO_API_URL, api_key)
}

/// Build the CoinGecko collection against a custom base URL.
pub fn coingecko_tools_at(base_url: &str, api_key: Option<&str>) -> Result<ToolCollection> {
    let api = Arc::new(CoinGeckoApi {
        base_url: http::base_url(base_url),
        api_key: require_credential(CredentialKey::CoingeckoApiKey, api_key)?,
    });

    Ok(vec![
        Arc::new(GetPriceTool::new(api.clone())),
        Arc::new(TrendingTool::new(api.clone())),
        Arc::new(SearchCoinsTool::new(api)),
    ])
}

// ============= coingecko_get_price =============

struct GetPriceTool {
    api: Arc<CoinGeckoApi>,
    params: ParamSchema,
}

#[derive(Deserialize)]
struct GetPriceArgs {
    tokens: Vec<String>,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default = "default_true")]
    include_24h_change: bool,
    #[serde(default)]
    include_market_cap: bool,
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_true() -> bool {
    true
}

impl GetPriceTool {
    fn new(api: Arc<CoinGeckoApi>) -> Self {
        Self {
            api,
            params: ParamSchema::new(vec![
                Field::string_array(
                    "tokens",
                    "Token symbols (e.g. btc, eth) or CoinGecko ids (e.g. avalanche-2)",
                )
                .required(),
                Field::string("currency", "Quote currency")
                    .non_empty()
                    .default_value(json!("usd")),
                Field::boolean("include_24h_change", "Include 24h price change percentage")
                    .default_value(json!(true)),
                Field::boolean("include_market_cap", "Include market capitalisation")
                    .default_value(json!(false)),
            ]),
        }
    }
}

#[async_trait]
impl Tool for GetPriceTool {
    fn name(&self) -> &str {
        "coingecko_get_price"
    }

    fn description(&self) -> &str {
        "Get current prices for one or more tokens from CoinGecko"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: GetPriceArgs = parse_args(args)?;
        let currency = args.currency.trim().to_ascii_lowercase();
        let ids: Vec<(String, String)> = args
            .tokens
            .iter()
            .map(|t| (t.trim().to_string(), coingecko_id(t)))
            .collect();

        let mut id_list: Vec<&str> = ids.iter().map(|(_, id)| id.as_str()).collect();
        id_list.sort_unstable();
        id_list.dedup();

        let body = self
            .api
            .get(
                ctx,
                "/simple/price",
                &[
                    ("ids", id_list.join(",")),
                    ("vs_currencies", currency.clone()),
                    ("include_24hr_change", args.include_24h_change.to_string()),
                    ("include_market_cap", args.include_market_cap.to_string()),
                ],
            )
            .await?;

        let mut prices = Vec::new();
        let mut not_found = Vec::new();
        for (token, id) in &ids {
            let Some(entry) = body.get(id) else {
                not_found.push(token.clone());
                continue;
            };
            let mut price = json!({
                "token": token,
                "id": id,
                "price": entry.get(&currency).cloned().unwrap_or(Value::Null),
            });
            if args.include_24h_change {
                price["change24h"] = entry
                    .get(format!("{}_24h_change", currency))
                    .cloned()
                    .unwrap_or(Value::Null);
            }
            if args.include_market_cap {
                price["marketCap"] = entry
                    .get(format!("{}_market_cap", currency))
                    .cloned()
                    .unwrap_or(Value::Null);
            }
            prices.push(price);
        }

        Ok(json!({
            "currency": currency,
            "prices": prices,
            "notFound": not_found,
        }))
    }
}

// ============= coingecko_get_trending =============

struct TrendingTool {
    api: Arc<CoinGeckoApi>,
    params: ParamSchema,
}

#[derive(Deserialize)]
struct TrendingArgs {
    #[serde(default = "default_trending_limit")]
    limit: usize,
}

fn default_trending_limit() -> usize {
    7
}

impl TrendingTool {
    fn new(api: Arc<CoinGeckoApi>) -> Self {
        Self {
            api,
            params: ParamSchema::new(vec![Field::integer(
                "limit",
                "Number of trending coins to return",
            )
            .range(1.0, 15.0)
            .default_value(json!(7))]),
        }
    }
}

#[async_trait]
impl Tool for TrendingTool {
    fn name(&self) -> &str {
        "coingecko_get_trending"
    }

    fn description(&self) -> &str {
        "List the coins currently trending on CoinGecko"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: TrendingArgs = parse_args(args)?;
        let body = self.api.get(ctx, "/search/trending", &[]).await?;

        let coins: Vec<Value> = require_array(PROVIDER, &body, "/coins")?
            .iter()
            .filter_map(|c| c.get("item"))
            .take(args.limit)
            .map(|item| {
                json!({
                    "id": item["id"],
                    "name": item["name"],
                    "symbol": item["symbol"],
                    "marketCapRank": item["market_cap_rank"],
                    "priceUsd": item.pointer("/data/price").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();

        Ok(json!({ "count": coins.len(), "coins": coins }))
    }
}

// ============= coingecko_search_coins =============

struct SearchCoinsTool {
    api: Arc<CoinGeckoApi>,
    params: ParamSchema,
}

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default = "default_search_limit")]
    limit: usize,
}

fn default_search_limit() -> usize {
    10
}

impl SearchCoinsTool {
    fn new(api: Arc<CoinGeckoApi>) -> Self {
        Self {
            api,
            params: ParamSchema::new(vec![
                Field::string("query", "Name or symbol to search for").required(),
                Field::integer("limit", "Maximum number of matches")
                    .range(1.0, 50.0)
                    .default_value(json!(10)),
            ]),
        }
    }
}

#[async_trait]
impl Tool for SearchCoinsTool {
    fn name(&self) -> &str {
        "coingecko_search_coins"
    }

    fn description(&self) -> &str {
        "Search CoinGecko for coins by name or symbol and return their ids"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: SearchArgs = parse_args(args)?;
        let body = self
            .api
            .get(ctx, "/search", &[("query", args.query.trim().to_string())])
            .await?;

        let coins: Vec<Value> = require_array(PROVIDER, &body, "/coins")?
            .iter()
            .take(args.limit)
            .map(|c| {
                json!({
                    "id": c["id"],
                    "name": c["name"],
                    "symbol": c["symbol"],
                    "marketCapRank": c["market_cap_rank"],
                })
            })
            .collect();

        Ok(json!({ "query": args.query, "count": coins.len(), "coins": coins }))
    }
}
