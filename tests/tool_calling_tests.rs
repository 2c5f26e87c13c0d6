//! Integration tests for tool registration and discovery
//!
//! These tests verify the registry as an agent runtime sees it:
//! - Tool definitions are valid function-calling schemas
//! - Collections are deterministic and names never collide
//! - Chain filtering and unknown-tool errors

mod common;

use serde_json::json;
use std::collections::HashSet;
use toolbelt::tools::defillama::defillama_tools;
use toolbelt::tools::sentiment::sentiment_tools;
use toolbelt::tools::swap::swap_tools;
use toolbelt::{AppError, Tool, ToolContext, ToolDefinition, ToolRegistry};

const UNUSED: &str = "http://127.0.0.1:9";

#[test]
fn test_registry_contains_every_tool() {
    let registry = common::registry_at(UNUSED);
    let expected = [
        "coingecko_get_price",
        "coingecko_get_trending",
        "coingecko_search_coins",
        "coinmarketcal_get_events",
        "defillama_get_token_price",
        "generate_image",
        "get_fear_greed_index",
        "get_supported_chains",
        "get_swap_quote",
        "pin_json_to_ipfs",
        "scrape_webpage",
        "yields_get_pools_by_token",
        "yields_get_top_pools",
    ];
    assert_eq!(registry.tool_names(), expected);
}

#[test]
fn test_tool_definitions_schema() {
    let registry = common::registry_at(UNUSED);

    for def in registry.get_tool_definitions() {
        assert!(!def.name.is_empty(), "Tool name should not be empty");
        assert!(!def.description.is_empty(), "Tool description should not be empty");

        // OpenAI / Anthropic function calling compatibility
        let params = &def.parameters;
        assert_eq!(params["type"], "object", "{}: parameters type should be 'object'", def.name);
        assert!(params["properties"].is_object(), "{}: should have properties", def.name);
        let required = params["required"].as_array().unwrap();
        for name in required {
            let name = name.as_str().unwrap();
            assert!(
                params["properties"].get(name).is_some(),
                "{}: required '{}' is not a declared property",
                def.name,
                name
            );
        }
    }
}

#[test]
fn test_names_unique_within_and_across_collections() {
    let mut seen = HashSet::new();
    for collection in common::collections_at(UNUSED) {
        for tool in collection {
            assert!(!tool.name().is_empty());
            assert!(seen.insert(tool.name().to_string()), "duplicate {}", tool.name());
        }
    }
}

#[test]
fn test_factories_are_deterministic() {
    let definitions = |collections: Vec<toolbelt::ToolCollection>| -> Vec<ToolDefinition> {
        collections
            .into_iter()
            .flatten()
            .map(|tool| tool.to_definition())
            .collect()
    };

    assert_eq!(
        definitions(common::collections_at(UNUSED)),
        definitions(common::collections_at(UNUSED))
    );
    assert_eq!(
        definitions(vec![swap_tools(None).unwrap()]),
        definitions(vec![swap_tools(None).unwrap()])
    );
}

#[test]
fn test_registering_a_collection_twice_is_rejected() {
    let mut registry = ToolRegistry::new();
    registry.register_collection(sentiment_tools().unwrap()).unwrap();
    let err = registry
        .register_collection(sentiment_tools().unwrap())
        .unwrap_err();
    assert!(matches!(err, AppError::Configuration(ref m) if m.contains("get_fear_greed_index")));
}

#[test]
fn test_definition_serialization() {
    let registry = common::registry_at(UNUSED);

    let chain_bound = registry
        .get("defillama_get_token_price")
        .unwrap()
        .to_definition();
    let value = serde_json::to_value(&chain_bound).unwrap();
    assert!(value["supportedChains"].as_array().unwrap().contains(&json!(8453)));

    let agnostic = registry.get("scrape_webpage").unwrap().to_definition();
    let value = serde_json::to_value(&agnostic).unwrap();
    assert!(value.get("supportedChains").is_none());
}

#[test]
fn test_tools_for_chain() {
    let registry = common::registry_at(UNUSED);

    let on_base: Vec<String> = registry
        .tools_for_chain(8453)
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert!(on_base.contains(&"defillama_get_token_price".to_string()));
    assert!(on_base.contains(&"scrape_webpage".to_string()));

    // Chain-bound tools drop out for an unknown chain; chain-agnostic ones stay
    let on_unknown: Vec<String> = registry
        .tools_for_chain(424242)
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert!(!on_unknown.contains(&"get_swap_quote".to_string()));
    assert!(on_unknown.contains(&"get_fear_greed_index".to_string()));
}

#[tokio::test]
async fn test_unknown_tool_lists_available() {
    let mut registry = ToolRegistry::new();
    registry.register_collection(defillama_tools().unwrap()).unwrap();

    let err = registry
        .execute("defillama_get_tvl", &ToolContext::default(), json!({}))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unknown tool 'defillama_get_tvl'. Available tools: defillama_get_token_price"
    );
}
