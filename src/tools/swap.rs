//! Cross-chain swap quotes from LI.FI.

use crate::tools::chains::{self, chain_by_id, CHAINS};
use crate::tools::context::ToolContext;
use crate::tools::http::{self, require};
use crate::tools::registry::{Tool, ToolCollection};
use crate::tools::schema::{parse_args, Field, ParamSchema};
use crate::types::{AppError, Result};
use crate::utils::config::CredentialKey;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const LIFI_API_URL: &str = "https://li.quest/v1";

const PROVIDER: &str = "LI.FI";

struct LifiApi {
    base_url: String,
    api_key: Option<String>,
}

impl LifiApi {
    /// The key the collection was built with, else the one in the caller's context.
    fn key<'a>(&'a self, ctx: &'a ToolContext) -> Option<&'a str> {
        self.api_key.as_deref().or_else(|| {
            ctx.credentials
                .get(CredentialKey::LifiApiKey)
                .map(str::trim)
                .filter(|k| !k.is_empty())
        })
    }
}

/// The API key is optional; without one LI.FI applies anonymous rate limits.
pub fn swap_tools(api_key: Option<&str>) -> Result<ToolCollection> {
    swap_tools_at(LIFI_API_URL, api_key)
}

pub fn swap_tools_at(base_url: &str, api_key: Option<&str>) -> Result<ToolCollection> {
    let api = Arc::new(LifiApi {
        base_url: http::base_url(base_url),
        api_key: api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string),
    });

    Ok(vec![
        Arc::new(SwapQuoteTool::new(api)),
        Arc::new(SupportedChainsTool::new()),
    ])
}

// ============= get_swap_quote =============

struct SwapQuoteTool {
    api: Arc<LifiApi>,
    params: ParamSchema,
    chains: Vec<u64>,
}

#[derive(Deserialize)]
struct SwapQuoteArgs {
    from_chain_id: u64,
    to_chain_id: u64,
    from_token: String,
    to_token: String,
    from_amount: String,
    from_address: String,
    #[serde(default = "default_slippage")]
    slippage: f64,
}

fn default_slippage() -> f64 {
    0.005
}

impl SwapQuoteTool {
    fn new(api: Arc<LifiApi>) -> Self {
        Self {
            api,
            params: ParamSchema::new(vec![
                Field::integer("from_chain_id", "Source chain id").required(),
                Field::integer("to_chain_id", "Destination chain id").required(),
                Field::string("from_token", "Token to sell: address or symbol on the source chain")
                    .required(),
                Field::string("to_token", "Token to buy: address or symbol on the destination chain")
                    .required(),
                Field::string("from_amount", "Amount to sell in the token's smallest unit")
                    .required(),
                Field::string("from_address", "Wallet address sending the tokens").required(),
                Field::number("slippage", "Maximum slippage as a fraction (0.005 = 0.5%)")
                    .range(0.0, 0.5)
                    .default_value(json!(0.005)),
            ]),
            chains: chains::supported_chain_ids(),
        }
    }

    fn check(args: &SwapQuoteArgs) -> Result<()> {
        for id in [args.from_chain_id, args.to_chain_id] {
            if chain_by_id(id).is_none() {
                return Err(AppError::InvalidArgument(format!(
                    "unsupported chain: {}",
                    chains::get_chain_name(id)
                )));
            }
        }
        let amount = args.from_amount.trim();
        if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit()) || amount.chars().all(|c| c == '0') {
            return Err(AppError::InvalidArgument(
                "from_amount must be a positive integer in base units".to_string(),
            ));
        }
        if !chains::is_evm_address(args.from_address.trim()) {
            return Err(AppError::InvalidArgument(format!(
                "from_address '{}' is not a valid EVM address",
                args.from_address
            )));
        }
        Ok(())
    }

    fn summarize(args: &SwapQuoteArgs, quote: &Value) -> Result<Value> {
        let estimate = require(PROVIDER, quote, "/estimate")?;
        let to_amount = require(PROVIDER, estimate, "/toAmount")?;

        let gas_cost_usd: f64 = estimate["gasCosts"]
            .as_array()
            .map(|costs| {
                costs
                    .iter()
                    .filter_map(|c| c["amountUSD"].as_str().and_then(|a| a.parse::<f64>().ok()))
                    .sum()
            })
            .unwrap_or(0.0);

        Ok(json!({
            "fromChain": chains::get_chain_name(args.from_chain_id),
            "toChain": chains::get_chain_name(args.to_chain_id),
            "tool": quote["toolDetails"]["name"].as_str().or(quote["tool"].as_str()),
            "fromToken": quote.pointer("/action/fromToken/symbol"),
            "toToken": quote.pointer("/action/toToken/symbol"),
            "fromAmount": estimate["fromAmount"],
            "toAmount": to_amount,
            "toAmountMin": estimate["toAmountMin"],
            "estimatedDurationSeconds": estimate["executionDuration"],
            "gasCostUsd": gas_cost_usd,
            "transactionRequest": quote["transactionRequest"],
        }))
    }
}

#[async_trait]
impl Tool for SwapQuoteTool {
    fn name(&self) -> &str {
        "get_swap_quote"
    }

    fn description(&self) -> &str {
        "Get a same-chain or cross-chain swap quote, including the transaction to sign, from LI.FI"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    fn supported_chains(&self) -> Option<&[u64]> {
        Some(&self.chains)
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: SwapQuoteArgs = parse_args(args)?;
        Self::check(&args)?;

        let mut request = ctx
            .http
            .get(format!("{}/quote", self.api.base_url))
            .query(&[
                ("fromChain", args.from_chain_id.to_string()),
                ("toChain", args.to_chain_id.to_string()),
                ("fromToken", args.from_token.trim().to_string()),
                ("toToken", args.to_token.trim().to_string()),
                ("fromAmount", args.from_amount.trim().to_string()),
                ("fromAddress", args.from_address.trim().to_string()),
                ("slippage", args.slippage.to_string()),
            ]);
        if let Some(key) = self.api.key(ctx) {
            request = request.header("x-lifi-api-key", key);
        }

        let quote = http::send_json(PROVIDER, request).await?;
        Self::summarize(&args, &quote)
    }
}

// ============= get_supported_chains =============

struct SupportedChainsTool {
    params: ParamSchema,
}

impl SupportedChainsTool {
    fn new() -> Self {
        Self {
            params: ParamSchema::empty(),
        }
    }
}

#[async_trait]
impl Tool for SupportedChainsTool {
    fn name(&self) -> &str {
        "get_supported_chains"
    }

    fn description(&self) -> &str {
        "List the chain ids and names the swap and price tools understand"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    async fn run(&self, ctx: &ToolContext, _args: Value) -> Result<Value> {
        let chains: Vec<Value> = CHAINS
            .iter()
            .map(|c| json!({ "id": c.id, "name": c.name, "configured": ctx.has_chain(c.id) }))
            .collect();
        Ok(json!({ "chains": chains }))
    }
}
