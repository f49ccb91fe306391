//! Service configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `FACTS_GATEWAY` (sections separated by
//! `__`, e.g. `FACTS_GATEWAY__SERVER__PORT=9000`).

use crate::error::{GatewayError, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "FACTS_GATEWAY";

/// Top-level configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub vector_db: VectorDbConfig,
    #[serde(default)]
    pub workers_ai: WorkersAiConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Prefix shared by every API route
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Relational store settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Vector index settings
#[derive(Debug, Deserialize)]
pub struct VectorDbConfig {
    #[serde(default = "default_vector_db_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
    /// Must match the embedding model's output dimensionality
    #[serde(default = "default_vector_size")]
    pub vector_size: u64,
    #[serde(default = "default_vector_timeout_secs")]
    pub timeout_secs: u64,
}

/// Hosted inference settings
#[derive(Debug, Deserialize)]
pub struct WorkersAiConfig {
    #[serde(default = "default_workers_ai_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub api_token: Option<SecretString>,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_inference_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8787 }
fn default_base_path() -> String { "/api".to_string() }
fn default_max_body_bytes() -> usize { 1024 * 1024 }
fn default_database_url() -> String { "sqlite://facts.db?mode=rwc".to_string() }
fn default_max_connections() -> u32 { 5 }
fn default_vector_db_url() -> String { "http://localhost:6334".to_string() }
fn default_collection_name() -> String { "facts".to_string() }
fn default_vector_size() -> u64 { 768 }
fn default_vector_timeout_secs() -> u64 { 10 }
fn default_workers_ai_base_url() -> String { "https://api.cloudflare.com/client/v4".to_string() }
fn default_embedding_model() -> String { "@cf/baai/bge-base-en-v1.5".to_string() }
fn default_chat_model() -> String { "@cf/meta/llama-2-7b-chat-int8".to_string() }
fn default_inference_timeout_ms() -> u64 { 30_000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            url: default_vector_db_url(),
            api_key: None,
            collection_name: default_collection_name(),
            vector_size: default_vector_size(),
            timeout_secs: default_vector_timeout_secs(),
        }
    }
}

impl Default for WorkersAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_workers_ai_base_url(),
            account_id: String::new(),
            api_token: None,
            embedding_model: default_embedding_model(),
            chat_model: default_chat_model(),
            timeout_ms: default_inference_timeout_ms(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl VectorDbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WorkersAiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from an optional file plus the environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(GatewayError::Config("server.port must be non-zero".to_string()));
        }

        let base = &self.server.base_path;
        if !base.is_empty() && !base.starts_with('/') {
            return Err(GatewayError::Config(format!(
                "server.base_path must start with '/': {}",
                base
            )));
        }

        if self.vector_db.vector_size == 0 {
            return Err(GatewayError::Config(
                "vector_db.vector_size must be non-zero".to_string(),
            ));
        }

        if self.workers_ai.account_id.trim().is_empty() {
            return Err(GatewayError::Config(
                "workers_ai.account_id is required".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.workers_ai.account_id = "acct".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.server.base_path, "/api");
        assert_eq!(config.vector_db.collection_name, "facts");
        assert_eq!(config.vector_db.vector_size, 768);
        assert_eq!(config.workers_ai.embedding_model, "@cf/baai/bge-base-en-v1.5");
        assert_eq!(config.workers_ai.chat_model, "@cf/meta/llama-2-7b-chat-int8");
        assert!(config.workers_ai.api_token.is_none());
    }

    #[test]
    fn test_validate_accepts_defaults_with_account() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_account_id() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_validate_base_path() {
        let mut config = valid_config();
        config.server.base_path = "api".to_string();
        assert!(config.validate().is_err());

        config.server.base_path = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_vector_size() {
        let mut config = valid_config();
        config.vector_db.vector_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_conversions() {
        let config = Config::default();
        assert_eq!(config.vector_db.timeout(), Duration::from_secs(10));
        assert_eq!(config.workers_ai.timeout(), Duration::from_millis(30_000));
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8787");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("facts_gateway_config_test.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9001\n\n[workers_ai]\naccount_id = \"acct-123\"\n",
        )
        .unwrap();

        let config = Config::load(path.to_str()).unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.base_path, "/api");
        assert_eq!(config.workers_ai.account_id, "acct-123");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let mut config = valid_config();
        config.workers_ai.api_token = Some(SecretString::new("super-secret".to_string()));
        let rendered = format!("{:?}", config.workers_ai);
        assert!(!rendered.contains("super-secret"));
    }
}
