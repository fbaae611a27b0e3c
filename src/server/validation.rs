//! Startup configuration validation

use super::config::AppConfig;
use super::loader::environment_name;
use anyhow::{bail, Result};
use tracing::warn;

/// Longest accepted gateway timeout
const MAX_TIMEOUT_SECS: u64 = 300;

/// Reject settings the server cannot run with; warn about risky ones
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let gateway = &config.gateway;
    if gateway.timeout_secs == 0 || gateway.timeout_secs > MAX_TIMEOUT_SECS {
        bail!(
            "gateway.timeout_secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS,
            gateway.timeout_secs
        );
    }
    if gateway.base_url.trim().is_empty() {
        bail!("gateway.base_url must not be empty");
    }
    if gateway.default_max_tokens == 0 {
        bail!("gateway.default_max_tokens must be greater than zero");
    }

    if gateway.api_token.trim().is_empty() {
        warn!("gateway.api_token is empty; generation calls will be rejected upstream");
    }

    if environment_name().eq_ignore_ascii_case("production") {
        if config.server.host == "0.0.0.0" && config.server.api_token().is_none() {
            warn!(
                "SECURITY WARNING: Server is exposed on all interfaces without server.api_token. \
                 Identity headers can be forged by any client."
            );
        }
        if config.database.in_memory {
            warn!("database.in_memory is set in production; nothing will persist");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = AppConfig::default();
        config.gateway.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
        config.gateway.timeout_secs = 301;
        assert!(validate_config(&config).is_err());
        config.gateway.timeout_secs = 300;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let mut config = AppConfig::default();
        config.gateway.base_url = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }
}
