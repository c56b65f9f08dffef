use crate::error::{Result, TakError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const SCHEMA_VERSION: &str = "tak/0.1";

#[derive(Debug, Deserialize, Clone, Serialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub adapter: AdapterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub schema_version: String,
}

#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Bare adapter: every payment is rejected.
    None,
    #[default]
    Mock,
    Ton,
}

#[derive(Debug, Deserialize, Clone, Serialize, Default)]
pub struct AdapterConfig {
    #[serde(default)]
    pub kind: AdapterKind,
    #[serde(default)]
    pub ton: TonConfig,
}

#[derive(Debug, Deserialize, Clone, Serialize, Default)]
pub struct TonConfig {
    pub rpc_url: Option<String>,
    pub api_key: Option<String>,
    pub wallet_address: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_seconds: Some(30),
            schema_version: SCHEMA_VERSION.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Some("compact".to_string()),
        }
    }
}

impl TonConfig {
    /// Fills unset fields from `TON_RPC_URL`, `TON_API_KEY` and `TON_WALLET_ADDRESS`.
    pub fn with_env_fallback(mut self) -> Self {
        if self.rpc_url.is_none() {
            self.rpc_url = std::env::var("TON_RPC_URL").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("TON_API_KEY").ok();
        }
        if self.wallet_address.is_none() {
            self.wallet_address = std::env::var("TON_WALLET_ADDRESS").ok();
        }
        self
    }

    pub fn is_complete(&self) -> bool {
        [&self.rpc_url, &self.api_key, &self.wallet_address]
            .iter()
            .all(|v| v.as_deref().map_or(false, |s| !s.is_empty()))
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| TakError::Config(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = toml::from_str(&config_str)?;

        Ok(config)
    }

    pub fn load_with_env_overrides<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("TAK_BASE_URL") {
            self.client.base_url = base_url;
        }

        if let Ok(api_key) = std::env::var("TAK_API_KEY") {
            self.client.api_key = Some(api_key);
        }

        if let Ok(rpc_url) = std::env::var("TON_RPC_URL") {
            self.adapter.ton.rpc_url = Some(rpc_url);
        }

        if let Ok(ton_key) = std::env::var("TON_API_KEY") {
            self.adapter.ton.api_key = Some(ton_key);
        }

        if let Ok(wallet) = std::env::var("TON_WALLET_ADDRESS") {
            self.adapter.ton.wallet_address = Some(wallet);
        }

        if let Ok(log_level) = std::env::var("RUST_LOG") {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_client()?;
        self.validate_adapter()
    }

    /// Checks everything the REST client needs; adapter settings are ignored.
    pub fn validate_client(&self) -> Result<()> {
        if self.client.base_url.is_empty() {
            return Err(TakError::Config("Base URL cannot be empty".to_string()));
        }

        if !self.client.base_url.starts_with("http://") && !self.client.base_url.starts_with("https://") {
            return Err(TakError::Config(format!(
                "Base URL must be http(s): {}",
                self.client.base_url
            )));
        }

        if self.client.schema_version.is_empty() {
            return Err(TakError::Config("Schema version cannot be empty".to_string()));
        }

        if self.client.timeout_seconds == Some(0) {
            return Err(TakError::Config("Timeout cannot be 0".to_string()));
        }

        Ok(())
    }

    pub fn validate_adapter(&self) -> Result<()> {
        if self.adapter.kind == AdapterKind::Ton && !self.adapter.ton.is_complete() {
            return Err(TakError::Config(
                "TON adapter selected but TON_RPC_URL, TON_API_KEY or TON_WALLET_ADDRESS is missing".to_string(),
            ));
        }

        Ok(())
    }
}

pub fn create_default_config_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let default_config = AppConfig::default();
    let toml_str = toml::to_string_pretty(&default_config)?;

    std::fs::write(path, toml_str)
        .map_err(|e| TakError::Config(format!("Failed to write default config file: {}", e)))?;

    Ok(())
}

/// Writes the default config to `path`, refusing to replace an existing file
/// unless `overwrite` is set.
pub fn init_config_file<P: AsRef<Path>>(path: P, overwrite: bool) -> Result<()> {
    let path = path.as_ref();
    if path.exists() && !overwrite {
        return Err(TakError::Config(format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        )));
    }
    create_default_config_file(path)
}
