use crate::tools::context::ToolContext;
use crate::tools::schema::ParamSchema;
use crate::types::{AppError, Result, ToolDefinition};
use crate::utils::config::ToolbeltConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A named, schema-validated unit of work.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool
    fn name(&self) -> &str;

    /// Returns a description of what this tool does
    fn description(&self) -> &str;

    /// Returns the declared parameters
    fn parameters(&self) -> &ParamSchema;

    /// Chain ids this tool is valid for, `None` if chain-agnostic
    fn supported_chains(&self) -> Option<&[u64]> {
        None
    }

    /// Tool body. Only called with arguments that passed [`Tool::parameters`].
    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value>;

    /// Validate `args` and run the tool.
    ///
    /// Validation failures return [`AppError::InvalidArgument`] without
    /// touching the network.
    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        self.parameters().validate(&args)?;
        self.run(ctx, args).await
    }

    /// Returns the JSON schema for this tool's parameters
    fn parameters_schema(&self) -> Value {
        self.parameters().to_json_schema()
    }

    /// Convert to ToolDefinition
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
            supported_chains: self.supported_chains().map(<[u64]>::to_vec),
        }
    }
}

/// Ordered tools built by one provider factory.
pub type ToolCollection = Vec<Arc<dyn Tool>>;

/// Name-keyed view over every configured tool collection.
///
/// Names must be unique: registering a name twice is a configuration error
/// rather than a silent overwrite.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Build every collection the configuration allows.
    ///
    /// Collections whose credentials are missing are skipped with a warning;
    /// any other factory error is returned.
    pub fn from_config(config: &ToolbeltConfig) -> Result<Self> {
        let mut registry = Self::new();

        for (label, built) in crate::tools::all_collections(&config.credentials) {
            match built {
                Ok(collection) => {
                    debug!(collection = label, tools = collection.len(), "Registering collection");
                    registry.register_collection(collection)?;
                }
                Err(AppError::Configuration(reason)) => {
                    warn!(collection = label, %reason, "Skipping unconfigured tool collection");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(registry)
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(AppError::Configuration(format!(
                "duplicate tool name: {}",
                name
            )));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn register_collection(&mut self, collection: ToolCollection) -> Result<()> {
        for tool in collection {
            self.register(tool)?;
        }
        Ok(())
    }

    /// Look up a tool, listing the available names on a miss.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn Tool>> {
        self.tools.get(name).ok_or_else(|| AppError::UnknownTool {
            name: name.to_string(),
            available: self.tool_names(),
        })
    }

    /// Definitions sorted by tool name.
    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.to_definition()).collect()
    }

    pub async fn execute(&self, name: &str, ctx: &ToolContext, args: Value) -> Result<Value> {
        let tool = self.get(name)?;
        info!(tool = name, "Executing tool");
        tool.execute(ctx, args).await
    }

    /// Get a sorted list of all registered tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tools usable on `chain_id`. Chain-agnostic tools are always included.
    pub fn tools_for_chain(&self, chain_id: u64) -> Vec<Arc<dyn Tool>> {
        self.tools
            .values()
            .filter(|tool| {
                tool.supported_chains()
                    .map(|chains| chains.contains(&chain_id))
                    .unwrap_or(true)
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema::Field;
    use serde_json::json;

    struct Echo {
        name: &'static str,
        params: ParamSchema,
        chains: Option<Vec<u64>>,
    }

    impl Echo {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                params: ParamSchema::new(vec![Field::string("text", "Text to echo").required()]),
                chains: None,
            }
        }

        fn on_chains(mut self, chains: &[u64]) -> Self {
            self.chains = Some(chains.to_vec());
            self
        }
    }

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "Echo the input text"
        }

        fn parameters(&self) -> &ParamSchema {
            &self.params
        }

        fn supported_chains(&self) -> Option<&[u64]> {
            self.chains.as_deref()
        }

        async fn run(&self, _ctx: &ToolContext, args: Value) -> Result<Value> {
            Ok(json!({ "echo": args["text"] }))
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.tool_names().len(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo::new("echo"))).unwrap();
        let err = registry.register(Arc::new(Echo::new("echo"))).unwrap_err();
        assert!(matches!(err, AppError::Configuration(ref m) if m.contains("echo")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_tool_enumerates_names() {
        let mut registry = ToolRegistry::new();
        registry
            .register_collection(vec![Arc::new(Echo::new("b")), Arc::new(Echo::new("a"))])
            .unwrap();

        match registry.get("zzz") {
            Err(AppError::UnknownTool { name, available }) => {
                assert_eq!(name, "zzz");
                assert_eq!(available, vec!["a".to_string(), "b".to_string()]);
            }
            _ => panic!("expected unknown tool error"),
        }
    }

    #[test]
    fn test_definitions_sorted() {
        let mut registry = ToolRegistry::new();
        registry
            .register_collection(vec![Arc::new(Echo::new("zeta")), Arc::new(Echo::new("alpha"))])
            .unwrap();
        let names: Vec<String> = registry
            .get_tool_definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_tools_for_chain() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo::new("any"))).unwrap();
        registry
            .register(Arc::new(Echo::new("base_only").on_chains(&[8453])))
            .unwrap();

        let on_base: Vec<String> = registry
            .tools_for_chain(8453)
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(on_base, vec!["any", "base_only"]);

        let on_mainnet = registry.tools_for_chain(1);
        assert_eq!(on_mainnet.len(), 1);
        assert_eq!(on_mainnet[0].name(), "any");
    }

    #[tokio::test]
    async fn test_execute_validates_first() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo::new("echo"))).unwrap();
        let ctx = ToolContext::default();

        let ok = registry
            .execute("echo", &ctx, json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(ok["echo"], "hi");

        let err = registry.execute("echo", &ctx, json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_nonexistent_tool() {
        let registry = ToolRegistry::new();
        let ctx = ToolContext::default();
        let result = registry
            .execute("nonexistent_tool", &ctx, json!({}))
            .await;
        assert!(matches!(result, Err(AppError::UnknownTool { .. })));
    }

    #[test]
    fn test_from_config_without_credentials_skips_keyed_collections() {
        let registry = ToolRegistry::from_config(&ToolbeltConfig::default()).unwrap();
        assert!(registry.has_tool("get_fear_greed_index"));
        assert!(registry.has_tool("yields_get_top_pools"));
        assert!(!registry.has_tool("coingecko_get_price"));
        assert!(!registry.has_tool("generate_image"));
    }
}
