//! Shared helpers for integration tests.

#![allow(dead_code)]

use toolbelt::tools::calendar::calendar_tools_at;
use toolbelt::tools::coingecko::coingecko_tools_at;
use toolbelt::tools::defillama::defillama_tools_at;
use toolbelt::tools::imagegen::{imagegen_tools_at, ImageGenEndpoints};
use toolbelt::tools::ipfs::ipfs_tools_at;
use toolbelt::tools::scrape::scrape_tools;
use toolbelt::tools::sentiment::sentiment_tools_at;
use toolbelt::tools::swap::swap_tools_at;
use toolbelt::tools::yields::yield_tools_at;
use toolbelt::{ToolCollection, ToolRegistry};

pub const PINATA_JWT: &str = "test-pinata-jwt";
pub const FIREWORKS_KEY: &str = "test-fireworks-key";

/// Every collection, with every upstream pointed at `uri`.
pub fn collections_at(uri: &str) -> Vec<ToolCollection> {
    let gateway = format!("{}/ipfs", uri);
    let endpoints = ImageGenEndpoints {
        fireworks_url: format!("{}/flux", uri),
        pinata_url: uri.to_string(),
        gateway_url: gateway.clone(),
    };

    vec![
        coingecko_tools_at(uri, Some("test-cg-key")).unwrap(),
        defillama_tools_at(uri).unwrap(),
        yield_tools_at(uri).unwrap(),
        calendar_tools_at(uri, Some("test-cmc-key")).unwrap(),
        sentiment_tools_at(uri).unwrap(),
        imagegen_tools_at(endpoints, Some(FIREWORKS_KEY), Some(PINATA_JWT)).unwrap(),
        ipfs_tools_at(uri, &gateway, Some(PINATA_JWT)).unwrap(),
        scrape_tools().unwrap(),
        swap_tools_at(uri, Some("test-lifi-key")).unwrap(),
    ]
}

/// A registry holding every tool, all talking to `uri`.
pub fn registry_at(uri: &str) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for collection in collections_at(uri) {
        registry
            .register_collection(collection)
            .expect("tool names should be unique");
    }
    registry
}
