//! Credential and settings resolution for Toolbelt
//!
//! Credentials are looked up through an ordered list of [`ConfigSource`]s.
//! The first source that returns a non-empty value wins and its label is
//! reported by `toolbelt setup`:
//!
//! 1. [`EnvSource`] - the process environment (after `.env` is loaded)
//! 2. [`FileSource`] - the `[credentials]` table of `toolbelt.toml`
//!
//! ```toml
//! chains = [1, 8453, 42161]
//! log_level = "info"
//!
//! [credentials]
//! coingecko_api_key = "CG-..."
//! pinata_jwt = "eyJ..."
//! ```

use crate::types::{AppError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "toolbelt.toml";

/// Every credential Toolbelt knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialKey {
    CoingeckoApiKey,
    CoinmarketcalApiKey,
    FireworksApiKey,
    PinataJwt,
    LifiApiKey,
}

impl CredentialKey {
    pub const ALL: [CredentialKey; 5] = [
        CredentialKey::CoingeckoApiKey,
        CredentialKey::CoinmarketcalApiKey,
        CredentialKey::FireworksApiKey,
        CredentialKey::PinataJwt,
        CredentialKey::LifiApiKey,
    ];

    /// Environment variable name, also the display name.
    pub fn env_var(self) -> &'static str {
        match self {
            CredentialKey::CoingeckoApiKey => "COINGECKO_API_KEY",
            CredentialKey::CoinmarketcalApiKey => "COINMARKETCAL_API_KEY",
            CredentialKey::FireworksApiKey => "FIREWORKS_API_KEY",
            CredentialKey::PinataJwt => "PINATA_JWT",
            CredentialKey::LifiApiKey => "LIFI_API_KEY",
        }
    }

    /// Key used in the `[credentials]` table of the config file.
    pub fn file_key(self) -> String {
        self.env_var().to_ascii_lowercase()
    }

    pub fn description(self) -> &'static str {
        match self {
            CredentialKey::CoingeckoApiKey => "CoinGecko API key (token prices, trending, search)",
            CredentialKey::CoinmarketcalApiKey => "CoinMarketCal API key (market events calendar)",
            CredentialKey::FireworksApiKey => "Fireworks AI API key (image generation)",
            CredentialKey::PinataJwt => "Pinata JWT (IPFS pinning)",
            CredentialKey::LifiApiKey => "LI.FI API key (optional, higher swap-quote rate limits)",
        }
    }

    /// Whether some tool collection cannot be built without this credential.
    pub fn is_required(self) -> bool {
        !matches!(self, CredentialKey::LifiApiKey)
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// Return the trimmed credential or a configuration error naming it.
pub fn require_credential(key: CredentialKey, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Configuration(format!(
            "{} is required but not set",
            key.env_var()
        ))),
    }
}

// ============= Sources =============

/// A place credentials can come from.
pub trait ConfigSource: Send + Sync {
    /// Label reported by `toolbelt setup`, e.g. `env`.
    fn label(&self) -> String;

    /// Raw value for `key`, if this source has one.
    fn lookup(&self, key: CredentialKey) -> Option<String>;
}

/// Reads credentials from environment variables.
pub struct EnvSource {
    vars: Option<HashMap<String, String>>,
}

impl EnvSource {
    /// Read from the live process environment.
    pub fn process() -> Self {
        Self { vars: None }
    }

    /// Read from a fixed set of variables instead of the process environment.
    pub fn from_map(vars: HashMap<String, String>) -> Self {
        Self { vars: Some(vars) }
    }
}

impl ConfigSource for EnvSource {
    fn label(&self) -> String {
        "env".to_string()
    }

    fn lookup(&self, key: CredentialKey) -> Option<String> {
        match &self.vars {
            Some(vars) => vars.get(key.env_var()).cloned(),
            None => std::env::var(key.env_var()).ok(),
        }
    }
}

/// Reads credentials from the `[credentials]` table of a config file.
pub struct FileSource {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, credentials: HashMap<String, String>) -> Self {
        Self {
            path: path.into(),
            credentials,
        }
    }
}

impl ConfigSource for FileSource {
    fn label(&self) -> String {
        format!("file ({})", self.path.display())
    }

    fn lookup(&self, key: CredentialKey) -> Option<String> {
        self.credentials.get(&key.file_key()).cloned()
    }
}

// ============= File format =============

/// On-disk shape of `toolbelt.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub chains: Option<Vec<u64>>,

    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub credentials: HashMap<String, String>,
}

impl FileConfig {
    /// Load the file if it exists. A missing file is `Ok(None)`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using environment only");
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            AppError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(Some(config))
    }
}

// ============= Resolution =============

/// Outcome of resolving one credential, used by `toolbelt setup`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub key: CredentialKey,
    pub description: &'static str,
    pub value: Option<String>,
    pub source: Option<String>,
}

impl ResolvedEntry {
    pub fn name(&self) -> &'static str {
        self.key.env_var()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// Queries sources in priority order.
pub struct ConfigResolver {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigResolver {
    pub fn new(sources: Vec<Box<dyn ConfigSource>>) -> Self {
        Self { sources }
    }

    pub fn resolve(&self, key: CredentialKey) -> ResolvedEntry {
        let hit = self.sources.iter().find_map(|source| {
            source
                .lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (v, source.label()))
        });

        let (value, source) = match hit {
            Some((v, label)) => (Some(v), Some(label)),
            None => (None, None),
        };

        ResolvedEntry {
            key,
            description: key.description(),
            value,
            source,
        }
    }

    pub fn resolve_all(&self) -> Vec<ResolvedEntry> {
        CredentialKey::ALL.iter().map(|k| self.resolve(*k)).collect()
    }
}

/// Resolved credential values, keyed by [`CredentialKey`].
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    values: BTreeMap<CredentialKey, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: CredentialKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn from_entries(entries: &[ResolvedEntry]) -> Self {
        let values = entries
            .iter()
            .filter_map(|e| e.value.clone().map(|v| (e.key, v)))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: CredentialKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret values
        let keys: Vec<&str> = self.values.keys().map(|k| k.env_var()).collect();
        f.debug_struct("Credentials").field("set", &keys).finish()
    }
}

// ============= Top-level config =============

/// Everything a single CLI invocation needs to know.
#[derive(Debug, Clone)]
pub struct ToolbeltConfig {
    pub path: PathBuf,
    pub chains: Vec<u64>,
    pub log_level: String,
    pub entries: Vec<ResolvedEntry>,
    pub credentials: Credentials,
}

impl ToolbeltConfig {
    /// Load `.env`, the config file at `path` (if present) and the process environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = path.as_ref();
        let file = FileConfig::load(path)?.unwrap_or_default();
        Ok(Self::from_parts(path, file, EnvSource::process()))
    }

    /// Build from an already-parsed file and an environment source.
    pub fn from_parts(path: &Path, file: FileConfig, env: EnvSource) -> Self {
        let resolver = ConfigResolver::new(vec![
            Box::new(env),
            Box::new(FileSource::new(path, file.credentials)),
        ]);
        let entries = resolver.resolve_all();
        let credentials = Credentials::from_entries(&entries);

        Self {
            path: path.to_path_buf(),
            chains: file.chains.unwrap_or_else(|| vec![1]),
            log_level: file.log_level.unwrap_or_else(|| "info".to_string()),
            entries,
            credentials,
        }
    }
}

impl Default for ToolbeltConfig {
    fn default() -> Self {
        Self::from_parts(
            Path::new(DEFAULT_CONFIG_FILE),
            FileConfig::default(),
            EnvSource::from_map(HashMap::new()),
        )
    }
}
