//! Gateway client configuration

use crate::util::mask_api_key;
use std::fmt;
use std::time::Duration;

/// Default gateway root
pub const DEFAULT_BASE_URL: &str = "https://gateway.ai.cloudflare.com/v1";

/// Header carrying the gateway credential
pub const DEFAULT_AUTH_HEADER: &str = "cf-aig-authorization";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Gateway provider configuration
#[derive(Clone)]
pub struct GatewayConfig {
    /// Gateway root URL, without trailing slash
    pub base_url: String,
    /// Account identifier
    pub account_id: String,
    /// Gateway identifier
    pub gateway_id: String,
    /// API credential, sent as a Bearer value
    pub api_token: String,
    /// Header name for the credential
    pub auth_header: String,
    /// Request timeout
    pub timeout: Duration,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("gateway_id", &self.gateway_id)
            .field("api_token", &mask_api_key(&self.api_token))
            .field("auth_header", &self.auth_header)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            account_id: String::new(),
            gateway_id: String::new(),
            api_token: String::new(),
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    /// Create a configuration for an account/gateway pair
    #[must_use]
    pub fn new(
        account_id: impl Into<String>,
        gateway_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            gateway_id: gateway_id.into(),
            api_token: api_token.into(),
            ..Default::default()
        }
    }

    /// Override the gateway root (used by tests against a local server)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run endpoint for a model
    #[must_use]
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}/{}/workers-ai/run/{}",
            self.base_url.trim_end_matches('/'),
            self.account_id,
            self.gateway_id,
            model.trim_start_matches('/')
        )
    }
}
