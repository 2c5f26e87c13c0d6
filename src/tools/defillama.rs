//! DefiLlama coin price tool (`coins.llama.fi`).

use crate::tools::chains::{self, chain_by_id};
use crate::tools::context::ToolContext;
use crate::tools::http::{self, require};
use crate::tools::registry::{Tool, ToolCollection};
use crate::tools::schema::{parse_args, Field, ParamSchema};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const DEFILLAMA_COINS_URL: &str = "https://coins.llama.fi";

const PROVIDER: &str = "DefiLlama";

pub fn defillama_tools() -> Result<ToolCollection> {
    defillama_tools_at(DEFILLAMA_COINS_URL)
}

pub fn defillama_tools_at(base_url: &str) -> Result<ToolCollection> {
    Ok(vec![Arc::new(TokenPriceTool::new(base_url))])
}

struct TokenPriceTool {
    base_url: String,
    params: ParamSchema,
    chains: Vec<u64>,
}

#[derive(Deserialize)]
struct TokenPriceArgs {
    chain_id: u64,
    token_address: String,
}

impl TokenPriceTool {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: http::base_url(base_url),
            params: ParamSchema::new(vec![
                Field::integer("chain_id", "EVM chain id the token lives on").required(),
                Field::string("token_address", "Token contract address").required(),
            ]),
            chains: chains::supported_chain_ids(),
        }
    }
}

#[async_trait]
impl Tool for TokenPriceTool {
    fn name(&self) -> &str {
        "defillama_get_token_price"
    }

    fn description(&self) -> &str {
        "Get the current USD price of a token by chain and contract address from DefiLlama"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    fn supported_chains(&self) -> Option<&[u64]> {
        Some(&self.chains)
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: TokenPriceArgs = parse_args(args)?;
        let chain = chain_by_id(args.chain_id).ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "unsupported chain: {}",
                chains::get_chain_name(args.chain_id)
            ))
        })?;

        let address = args.token_address.trim();
        if !chains::is_evm_address(address) {
            return Err(AppError::InvalidArgument(format!(
                "token_address must be a 0x-prefixed 40 hex digit address, got '{}'",
                address
            )));
        }
        let coin_key = format!("{}:{}", chain.llama_slug, address);
        let request = ctx
            .http
            .get(format!("{}/prices/current/{}", self.base_url, coin_key));
        let body = http::send_json(PROVIDER, request).await?;

        let coins = require(PROVIDER, &body, "/coins")?;
        // DefiLlama may echo the key with a lower-cased address
        let coin = coins
            .get(&coin_key)
            .or_else(|| coins.get(coin_key.to_ascii_lowercase()))
            .ok_or_else(|| {
                AppError::Parse(format!("{} returned no price for {}", PROVIDER, coin_key))
            })?;

        let price = coin.get("price").and_then(Value::as_f64).ok_or_else(|| {
            AppError::Parse(format!("{} response is missing 'price' for {}", PROVIDER, coin_key))
        })?;

        Ok(json!({
            "chain": chain.name,
            "chainId": chain.id,
            "address": address,
            "symbol": coin["symbol"],
            "decimals": coin["decimals"],
            "priceUsd": price,
            "confidence": coin["confidence"],
            "timestamp": coin["timestamp"],
        }))
    }
}
