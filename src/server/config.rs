//! Server configuration types

use colony_core::PersonaRegistry;
use colony_llm::gateway::{DEFAULT_AUTH_HEADER, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use colony_llm::GatewayConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub personas: PersonaRegistry,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared bearer token; empty disables the check
    #[serde(default)]
    pub api_token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_token: String::new(),
        }
    }
}

impl ServerConfig {
    /// The configured bearer token, if any
    pub fn api_token(&self) -> Option<String> {
        let token = self.api_token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

/// SQLite settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file; empty means the default data directory
    #[serde(default)]
    pub path: String,
    /// Keep everything in memory (nothing survives a restart)
    #[serde(default)]
    pub in_memory: bool,
}

impl DatabaseConfig {
    /// Resolved database file path
    pub fn resolved_path(&self) -> PathBuf {
        if self.path.trim().is_empty() {
            colony_store::default_db_path()
        } else {
            PathBuf::from(self.path.trim())
        }
    }
}

/// AI gateway settings
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub gateway_id: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_auth_header")]
    pub auth_header: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

impl std::fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("gateway_id", &self.gateway_id)
            .field("api_token", &colony_llm::util::mask_api_key(&self.api_token))
            .field("auth_header", &self.auth_header)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_max_tokens", &self.default_max_tokens)
            .finish()
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            account_id: String::new(),
            gateway_id: String::new(),
            api_token: String::new(),
            auth_header: default_auth_header(),
            timeout_secs: default_timeout_secs(),
            default_max_tokens: default_max_tokens(),
        }
    }
}

impl GatewaySettings {
    /// Client configuration for these settings
    pub fn client_config(&self) -> GatewayConfig {
        let mut config = GatewayConfig::new(
            self.account_id.clone(),
            self.gateway_id.clone(),
            self.api_token.clone(),
        )
        .with_base_url(self.base_url.clone())
        .with_timeout(Duration::from_secs(self.timeout_secs));
        config.auth_header = self.auth_header.clone();
        config
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_auth_header() -> String {
    DEFAULT_AUTH_HEADER.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_tokens() -> u32 {
    colony_core::DEFAULT_MAX_TOKENS
}

/// Catalog bootstrap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Insert the platform agents at startup
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_defaults: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_token_disables_check() {
        let mut server = ServerConfig::default();
        assert_eq!(server.api_token(), None);
        server.api_token = "  secret ".to_string();
        assert_eq!(server.api_token().as_deref(), Some("secret"));
    }

    #[test]
    fn test_gateway_settings_map_to_client_config() {
        let settings = GatewaySettings {
            account_id: "acct".to_string(),
            gateway_id: "gw".to_string(),
            api_token: "token-1234567890".to_string(),
            auth_header: "x-auth".to_string(),
            timeout_secs: 10,
            ..Default::default()
        };
        let config = settings.client_config();
        assert_eq!(config.auth_header, "x-auth");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.endpoint("@cf/m").ends_with("/acct/gw/workers-ai/run/@cf/m"));
        assert!(!format!("{:?}", settings).contains("token-1234567890"));
    }

    #[test]
    fn test_blank_database_path_uses_data_dir() {
        let db = DatabaseConfig::default();
        assert!(db.resolved_path().ends_with("colony.db"));
    }
}
