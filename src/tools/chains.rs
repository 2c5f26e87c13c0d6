//! Chain id lookup tables.
//!
//! DefiLlama identifies chains by slug on `coins.llama.fi` and by display name
//! on `yields.llama.fi`; both are kept next to the EVM chain id.

/// Static information about one EVM chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainInfo {
    pub id: u64,
    pub name: &'static str,
    /// Prefix used by `coins.llama.fi`, e.g. `ethereum:0x...`.
    pub llama_slug: &'static str,
    /// Value of the `chain` field in `yields.llama.fi` pools.
    pub llama_name: &'static str,
}

pub const CHAINS: &[ChainInfo] = &[
    ChainInfo { id: 1, name: "Ethereum", llama_slug: "ethereum", llama_name: "Ethereum" },
    ChainInfo { id: 10, name: "Optimism", llama_slug: "optimism", llama_name: "Optimism" },
    ChainInfo { id: 56, name: "BNB Chain", llama_slug: "bsc", llama_name: "BSC" },
    ChainInfo { id: 100, name: "Gnosis", llama_slug: "xdai", llama_name: "Gnosis" },
    ChainInfo { id: 137, name: "Polygon", llama_slug: "polygon", llama_name: "Polygon" },
    ChainInfo { id: 250, name: "Fantom", llama_slug: "fantom", llama_name: "Fantom" },
    ChainInfo { id: 324, name: "zkSync Era", llama_slug: "era", llama_name: "zkSync Era" },
    ChainInfo { id: 5000, name: "Mantle", llama_slug: "mantle", llama_name: "Mantle" },
    ChainInfo { id: 8453, name: "Base", llama_slug: "base", llama_name: "Base" },
    ChainInfo { id: 34443, name: "Mode", llama_slug: "mode", llama_name: "Mode" },
    ChainInfo { id: 42161, name: "Arbitrum", llama_slug: "arbitrum", llama_name: "Arbitrum" },
    ChainInfo { id: 43114, name: "Avalanche", llama_slug: "avax", llama_name: "Avalanche" },
    ChainInfo { id: 59144, name: "Linea", llama_slug: "linea", llama_name: "Linea" },
    ChainInfo { id: 81457, name: "Blast", llama_slug: "blast", llama_name: "Blast" },
    ChainInfo { id: 534352, name: "Scroll", llama_slug: "scroll", llama_name: "Scroll" },
];

pub fn chain_by_id(id: u64) -> Option<&'static ChainInfo> {
    CHAINS.iter().find(|c| c.id == id)
}

/// Human-readable chain name, `"Chain {id}"` for ids not in the table.
pub fn get_chain_name(id: u64) -> String {
    match chain_by_id(id) {
        Some(chain) => chain.name.to_string(),
        None => format!("Chain {}", id),
    }
}

/// Find a chain by name, DefiLlama slug or DefiLlama display name (case-insensitive).
pub fn chain_by_name(name: &str) -> Option<&'static ChainInfo> {
    let name = name.trim();
    CHAINS.iter().find(|c| {
        c.name.eq_ignore_ascii_case(name)
            || c.llama_slug.eq_ignore_ascii_case(name)
            || c.llama_name.eq_ignore_ascii_case(name)
    })
}

/// `0x` followed by 40 hex digits.
pub fn is_evm_address(value: &str) -> bool {
    value.len() == 42
        && value.starts_with("0x")
        && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

pub fn supported_chain_ids() -> Vec<u64> {
    CHAINS.iter().map(|c| c.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_evm_address() {
        assert!(is_evm_address("0xAbCdEf0123456789abcdef0123456789ABCDEF01"));
        assert!(!is_evm_address("0x123"));
        assert!(!is_evm_address("1x1111111111111111111111111111111111111111"));
        assert!(!is_evm_address("0xZZ11111111111111111111111111111111111111"));
        assert!(!is_evm_address("0xabc/../../../pools"));
        assert!(!is_evm_address("0x833589fcd6edb6e08f4c7c32d4f71b54bda0291?"));
    }

    #[rstest]
    #[case(1, "Ethereum")]
    #[case(8453, "Base")]
    #[case(42161, "Arbitrum")]
    #[case(56, "BNB Chain")]
    #[case(999999, "Chain 999999")]
    #[case(0, "Chain 0")]
    fn test_get_chain_name(#[case] id: u64, #[case] expected: &str) {
        assert_eq!(get_chain_name(id), expected);
    }

    #[test]
    fn test_chain_by_name_matches_aliases() {
        assert_eq!(chain_by_name("bsc").map(|c| c.id), Some(56));
        assert_eq!(chain_by_name("BNB Chain").map(|c| c.id), Some(56));
        assert_eq!(chain_by_name(" arbitrum ").map(|c| c.id), Some(42161));
        assert!(chain_by_name("narnia").is_none());
    }

    #[test]
    fn test_chain_ids_unique() {
        let mut ids = supported_chain_ids();
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len);
    }
}
