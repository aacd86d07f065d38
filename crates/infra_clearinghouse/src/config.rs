//! Clearinghouse configuration

use edi_kernel::ClearinghouseMode;
use serde::Deserialize;

/// Prefix marking a credential as a test key
const TEST_KEY_PREFIX: &str = "test_";

/// Clearinghouse connection configuration
///
/// Fields absent from the environment fall back to the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClearinghouseConfig {
    /// Base URL of the clearinghouse API
    pub base_url: String,
    /// Bearer API key; absent or test-prefixed keys select sandbox mode
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Total attempts allowed for a request that keeps failing transiently
    pub max_retries: u32,
    /// Retry delay in milliseconds (exponential backoff base)
    pub retry_delay_ms: u64,
}

impl Default for ClearinghouseConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.clearinghouse.example.com".to_string(),
            api_key: None,
            timeout_ms: 30_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
        }
    }
}

impl ClearinghouseConfig {
    /// Loads configuration from `CLEARINGHOUSE_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CLEARINGHOUSE"))
            .build()?
            .try_deserialize()
    }

    /// Derives the operating mode from the configured credential
    ///
    /// A missing key or a recognizably-test key means sandbox. The decision
    /// is made here, once, so clients never silently switch behavior
    /// mid-call.
    pub fn mode(&self) -> ClearinghouseMode {
        match &self.api_key {
            Some(key) if !key.is_empty() && !key.starts_with(TEST_KEY_PREFIX) => {
                ClearinghouseMode::Live
            }
            _ => ClearinghouseMode::Sandbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_live_with_real_key() {
        let config = ClearinghouseConfig {
            api_key: Some("sk_live_abc123".to_string()),
            ..Default::default()
        };
        assert_eq!(config.mode(), ClearinghouseMode::Live);
    }

    #[test]
    fn test_mode_sandbox_without_key() {
        assert_eq!(
            ClearinghouseConfig::default().mode(),
            ClearinghouseMode::Sandbox
        );
    }

    #[test]
    fn test_mode_sandbox_with_test_key() {
        let config = ClearinghouseConfig {
            api_key: Some("test_abc123".to_string()),
            ..Default::default()
        };
        assert_eq!(config.mode(), ClearinghouseMode::Sandbox);
    }

    #[test]
    fn test_mode_sandbox_with_empty_key() {
        let config = ClearinghouseConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.mode(), ClearinghouseMode::Sandbox);
    }
}
