//! Crypto and web tools
//!
//! Every provider module exposes a factory returning a [`ToolCollection`].
//! Factories check their credentials up front, so a collection either builds
//! completely or fails with [`AppError::Configuration`](crate::types::AppError).
//!
//! # Module Structure
//!
//! - [`registry`] - the [`Tool`] trait and the name-keyed [`ToolRegistry`]
//! - [`schema`] - declarative parameter schemas and argument validation
//! - [`context`] - the shared HTTP client and configured chains
//! - [`http`] - response checking shared by every provider
//! - [`chains`] - the EVM chain table
//!
//! # Collections
//!
//! | Module | Tools | Credential |
//! |--------|-------|------------|
//! | [`coingecko`] | `coingecko_get_price`, `coingecko_get_trending`, `coingecko_search_coins` | `COINGECKO_API_KEY` |
//! | [`defillama`] | `defillama_get_token_price` | - |
//! | [`yields`] | `yields_get_top_pools`, `yields_get_pools_by_token` | - |
//! | [`calendar`] | `coinmarketcal_get_events` | `COINMARKETCAL_API_KEY` |
//! | [`sentiment`] | `get_fear_greed_index` | - |
//! | [`imagegen`] | `generate_image` | `FIREWORKS_API_KEY`, `PINATA_JWT` |
//! | [`ipfs`] | `pin_json_to_ipfs` | `PINATA_JWT` |
//! | [`scrape`] | `scrape_webpage` | - |
//! | [`swap`] | `get_swap_quote`, `get_supported_chains` | `LIFI_API_KEY` (optional) |
//!
//! ```ignore
//! let config = ToolbeltConfig::load("toolbelt.toml")?;
//! let registry = ToolRegistry::from_config(&config)?;
//! let ctx = ToolContext::from_config(&config);
//! let price = registry
//!     .execute("coingecko_get_price", &ctx, json!({"tokens": ["ETH"]}))
//!     .await?;
//! ```

pub mod calendar;
pub mod chains;
pub mod coingecko;
pub mod context;
pub mod defillama;
pub mod http;
pub mod imagegen;
pub mod ipfs;
pub mod registry;
pub mod schema;
pub mod scrape;
pub mod sentiment;
pub mod swap;
pub mod yields;

pub use context::ToolContext;
pub use registry::{Tool, ToolCollection, ToolRegistry};
pub use schema::{Field, ParamSchema};

use crate::types::Result;
use crate::utils::config::{CredentialKey, Credentials};

/// Build every collection, labelled by module, in registration order.
pub fn all_collections(credentials: &Credentials) -> Vec<(&'static str, Result<ToolCollection>)> {
    let key = |k: CredentialKey| credentials.get(k);

    vec![
        ("coingecko", coingecko::coingecko_tools(key(CredentialKey::CoingeckoApiKey))),
        ("defillama", defillama::defillama_tools()),
        ("yields", yields::yield_tools()),
        (
            "calendar",
            calendar::calendar_tools(key(CredentialKey::CoinmarketcalApiKey)),
        ),
        ("sentiment", sentiment::sentiment_tools()),
        (
            "imagegen",
            imagegen::imagegen_tools(
                key(CredentialKey::FireworksApiKey),
                key(CredentialKey::PinataJwt),
            ),
        ),
        ("ipfs", ipfs::ipfs_tools(key(CredentialKey::PinataJwt))),
        ("scrape", scrape::scrape_tools()),
        ("swap", swap::swap_tools(key(CredentialKey::LifiApiKey))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn full_credentials() -> Credentials {
        CredentialKey::ALL
            .iter()
            .fold(Credentials::new(), |creds, key| creds.with(*key, "test-value"))
    }

    #[test]
    fn test_tool_names_unique_across_collections() {
        let mut seen = HashSet::new();
        for (label, built) in all_collections(&full_credentials()) {
            let collection = built.unwrap_or_else(|e| panic!("{} failed: {}", label, e));
            for tool in collection {
                assert!(seen.insert(tool.name().to_string()), "duplicate {}", tool.name());
            }
        }
        assert_eq!(seen.len(), 13);
    }

    #[test]
    fn test_keyless_collections_always_build() {
        let built: Vec<&str> = all_collections(&Credentials::new())
            .into_iter()
            .filter(|(_, c)| c.is_ok())
            .map(|(label, _)| label)
            .collect();
        assert_eq!(built, vec!["defillama", "yields", "sentiment", "scrape", "swap"]);
    }
}
