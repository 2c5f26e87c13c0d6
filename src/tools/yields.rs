//! Yield aggregator tools backed by DefiLlama (`yields.llama.fi`)
//!
//! Pool data is fetched through [`fetch_pools`], which never fails: any
//! transport, status or decoding problem is logged and produces an empty
//! pool list so the tools answer "no pools" instead of erroring.

use crate::tools::chains::{self, chain_by_id, chain_by_name, ChainInfo};
use crate::tools::context::ToolContext;
use crate::tools::http;
use crate::tools::registry::{Tool, ToolCollection};
use crate::tools::schema::{parse_args, Field, ParamSchema};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

pub const DEFILLAMA_YIELDS_URL: &str = "https://yields.llama.fi";

const PROVIDER: &str = "DefiLlama Yields";

/// Coarse risk bucket derived from APY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket an APY percentage: up to 4% is low, up to 10% medium, above that high.
pub fn assess_risk(apy: f64) -> RiskLevel {
    if apy <= 4.0 {
        RiskLevel::Low
    } else if apy <= 10.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// One pool as returned by `/pools`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YieldPool {
    pub pool: String,
    pub chain: String,
    pub project: String,
    pub symbol: String,
    #[serde(default)]
    pub tvl_usd: f64,
    #[serde(default)]
    pub apy: Option<f64>,
    #[serde(default)]
    pub apy_base: Option<f64>,
    #[serde(default)]
    pub apy_reward: Option<f64>,
    #[serde(default)]
    pub stablecoin: bool,
    #[serde(default)]
    pub il_risk: Option<String>,
}

impl YieldPool {
    pub fn apy_or_zero(&self) -> f64 {
        self.apy.unwrap_or(0.0)
    }

    fn matches_token(&self, token: &str) -> bool {
        self.symbol
            .split(['-', '/', ' '])
            .any(|part| part.eq_ignore_ascii_case(token))
    }

    fn to_json(&self) -> Value {
        let apy = self.apy_or_zero();
        json!({
            "pool": self.pool,
            "project": self.project,
            "chain": self.chain,
            "chainId": chain_by_name(&self.chain).map(|c| c.id),
            "symbol": self.symbol,
            "tvlUsd": self.tvl_usd,
            "apy": apy,
            "apyBase": self.apy_base,
            "apyReward": self.apy_reward,
            "stablecoin": self.stablecoin,
            "ilRisk": self.il_risk,
            "risk": assess_risk(apy),
        })
    }
}

#[derive(Deserialize)]
struct PoolsResponse {
    data: Vec<YieldPool>,
}

/// Fetch all pools, degrading to an empty list on any failure.
pub async fn fetch_pools(http_client: &reqwest::Client, base_url: &str) -> Vec<YieldPool> {
    let request = http_client.get(format!("{}/pools", http::base_url(base_url)));
    let body = match http::send_json(PROVIDER, request).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Yield pool fetch failed, returning no pools");
            return Vec::new();
        }
    };

    match serde_json::from_value::<PoolsResponse>(body) {
        Ok(parsed) => parsed.data,
        Err(e) => {
            warn!(error = %e, "Unexpected yield pool payload, returning no pools");
            Vec::new()
        }
    }
}

pub fn yield_tools() -> Result<ToolCollection> {
    yield_tools_at(DEFILLAMA_YIELDS_URL)
}

pub fn yield_tools_at(base_url: &str) -> Result<ToolCollection> {
    let base_url = http::base_url(base_url);
    Ok(vec![
        Arc::new(TopPoolsTool::new(base_url.clone())),
        Arc::new(PoolsByTokenTool::new(base_url)),
    ])
}

fn resolve_chain(chain_id: Option<u64>) -> Result<Option<&'static ChainInfo>> {
    match chain_id {
        None => Ok(None),
        Some(id) => chain_by_id(id).map(Some).ok_or_else(|| {
            AppError::InvalidArgument(format!("unsupported chain: {}", chains::get_chain_name(id)))
        }),
    }
}

fn rank(mut pools: Vec<YieldPool>, limit: usize) -> Value {
    pools.sort_by(|a, b| b.apy_or_zero().total_cmp(&a.apy_or_zero()));
    let pools: Vec<Value> = pools.iter().take(limit).map(YieldPool::to_json).collect();
    json!({ "count": pools.len(), "pools": pools })
}

// ============= yields_get_top_pools =============

struct TopPoolsTool {
    base_url: String,
    params: ParamSchema,
    chains: Vec<u64>,
}

#[derive(Deserialize)]
struct TopPoolsArgs {
    chain_id: Option<u64>,
    #[serde(default = "default_min_tvl")]
    min_tvl_usd: f64,
    #[serde(default)]
    stablecoin_only: bool,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_min_tvl() -> f64 {
    1_000_000.0
}

fn default_limit() -> usize {
    10
}

impl TopPoolsTool {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            params: ParamSchema::new(vec![
                Field::integer("chain_id", "Only include pools on this chain"),
                Field::number("min_tvl_usd", "Minimum total value locked in USD")
                    .min(0.0)
                    .default_value(json!(1_000_000)),
                Field::boolean("stablecoin_only", "Only include stablecoin pools")
                    .default_value(json!(false)),
                Field::integer("limit", "Maximum number of pools")
                    .range(1.0, 50.0)
                    .default_value(json!(10)),
            ]),
            chains: chains::supported_chain_ids(),
        }
    }
}

#[async_trait]
impl Tool for TopPoolsTool {
    fn name(&self) -> &str {
        "yields_get_top_pools"
    }

    fn description(&self) -> &str {
        "Find the highest-APY yield pools, with a low/medium/high risk rating"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    fn supported_chains(&self) -> Option<&[u64]> {
        Some(&self.chains)
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: TopPoolsArgs = parse_args(args)?;
        let chain = resolve_chain(args.chain_id)?;

        let pools: Vec<YieldPool> = fetch_pools(&ctx.http, &self.base_url)
            .await
            .into_iter()
            .filter(|p| chain.map_or(true, |c| p.chain.eq_ignore_ascii_case(c.llama_name)))
            .filter(|p| p.tvl_usd >= args.min_tvl_usd)
            .filter(|p| !args.stablecoin_only || p.stablecoin)
            .filter(|p| p.apy.is_some())
            .collect();

        Ok(rank(pools, args.limit))
    }
}

// ============= yields_get_pools_by_token =============

struct PoolsByTokenTool {
    base_url: String,
    params: ParamSchema,
    chains: Vec<u64>,
}

#[derive(Deserialize)]
struct PoolsByTokenArgs {
    token: String,
    chain_id: Option<u64>,
    #[serde(default)]
    min_tvl_usd: f64,
    #[serde(default = "default_limit")]
    limit: usize,
}

impl PoolsByTokenTool {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            params: ParamSchema::new(vec![
                Field::string("token", "Token symbol to look for, e.g. USDC").required(),
                Field::integer("chain_id", "Only include pools on this chain"),
                Field::number("min_tvl_usd", "Minimum total value locked in USD")
                    .min(0.0)
                    .default_value(json!(0)),
                Field::integer("limit", "Maximum number of pools")
                    .range(1.0, 50.0)
                    .default_value(json!(10)),
            ]),
            chains: chains::supported_chain_ids(),
        }
    }
}

#[async_trait]
impl Tool for PoolsByTokenTool {
    fn name(&self) -> &str {
        "yields_get_pools_by_token"
    }

    fn description(&self) -> &str {
        "Find yield pools that include a given token symbol, ranked by APY"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    fn supported_chains(&self) -> Option<&[u64]> {
        Some(&self.chains)
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: PoolsByTokenArgs = parse_args(args)?;
        let chain = resolve_chain(args.chain_id)?;
        let token = args.token.trim();

        let pools: Vec<YieldPool> = fetch_pools(&ctx.http, &self.base_url)
            .await
            .into_iter()
            .filter(|p| p.matches_token(token))
            .filter(|p| chain.map_or(true, |c| p.chain.eq_ignore_ascii_case(c.llama_name)))
            .filter(|p| p.tvl_usd >= args.min_tvl_usd)
            .collect();

        let mut result = rank(pools, args.limit);
        result["token"] = json!(token);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, RiskLevel::Low)]
    #[case(4.0, RiskLevel::Low)]
    #[case(4.01, RiskLevel::Medium)]
    #[case(10.0, RiskLevel::Medium)]
    #[case(10.01, RiskLevel::High)]
    #[case(250.0, RiskLevel::High)]
    fn test_assess_risk_thresholds(#[case] apy: f64, #[case] expected: RiskLevel) {
        assert_eq!(assess_risk(apy), expected);
    }

    #[test]
    fn test_assess_risk_is_monotonic() {
        let mut last = RiskLevel::Low;
        for step in 0..2000 {
            let level = assess_risk(step as f64 * 0.01);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn test_risk_serializes_lowercase() {
        assert_eq!(serde_json::to_value(RiskLevel::Medium).unwrap(), json!("medium"));
        assert_eq!(RiskLevel::High.to_string(), "high");
    }

    fn pool(symbol: &str) -> YieldPool {
        YieldPool {
            pool: "p".to_string(),
            chain: "Ethereum".to_string(),
            project: "aave-v3".to_string(),
            symbol: symbol.to_string(),
            tvl_usd: 1.0,
            apy: Some(5.0),
            apy_base: None,
            apy_reward: None,
            stablecoin: false,
            il_risk: None,
        }
    }

    #[test]
    fn test_matches_token_by_symbol_part() {
        assert!(pool("USDC-WETH").matches_token("usdc"));
        assert!(pool("WETH").matches_token("WETH"));
        assert!(!pool("USDC.E").matches_token("usdc"));
        assert!(!pool("WSTETH").matches_token("eth"));
    }

    #[test]
    fn test_rank_orders_by_apy_desc() {
        let mut low = pool("A");
        low.apy = Some(1.0);
        let mut high = pool("B");
        high.apy = Some(20.0);
        let ranked = rank(vec![low, high], 10);
        assert_eq!(ranked["count"], 2);
        assert_eq!(ranked["pools"][0]["symbol"], "B");
        assert_eq!(ranked["pools"][0]["risk"], "high");
        assert_eq!(ranked["pools"][1]["risk"], "low");
    }
}
