//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;

/// Default SearchAPI endpoint
pub const DEFAULT_SEARCHAPI_URL: &str = "https://www.searchapi.io/api/v1/search";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Flight data provider configuration
    pub provider: ProviderConfig,
    /// Search and conversation limits
    pub search: SearchConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Flight data provider configuration
#[derive(Clone)]
pub struct ProviderConfig {
    /// SearchAPI credential; empty means every provider call fails with an
    /// authentication error
    pub api_key: String,
    /// Search endpoint
    pub base_url: String,
    /// Per-request timeout (in seconds)
    pub timeout_secs: u64,
    /// Currency requested from the provider
    pub currency: String,
}

// keeps the credential out of "Configuration loaded" logs
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("currency", &self.currency)
            .finish()
    }
}

/// Search and conversation limits
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum offers kept in each of the best/other lists
    pub max_offers_per_bucket: usize,
    /// Maximum airports offered when a place name is ambiguous
    pub max_airport_choices: usize,
    /// Flight search attempts per conversation before giving up
    pub max_search_attempts: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_SEARCHAPI_URL.to_string(),
            timeout_secs: 30,
            currency: "USD".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_offers_per_bucket: 3,
            max_airport_choices: 5,
            max_search_attempts: 2,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let provider_defaults = ProviderConfig::default();
        let search_defaults = SearchConfig::default();

        Self {
            server: ServerConfig {
                port: parsed_var("PORT").unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            provider: ProviderConfig {
                api_key: env::var("SEARCHAPI_KEY").unwrap_or(provider_defaults.api_key),
                base_url: env::var("SEARCHAPI_URL").unwrap_or(provider_defaults.base_url),
                timeout_secs: parsed_var("SEARCHAPI_TIMEOUT_SECS")
                    .filter(|t| *t > 0)
                    .unwrap_or(provider_defaults.timeout_secs),
                currency: env::var("SEARCHAPI_CURRENCY").unwrap_or(provider_defaults.currency),
            },
            search: SearchConfig {
                max_offers_per_bucket: parsed_var("MAX_OFFERS_PER_BUCKET")
                    .filter(|n| *n > 0)
                    .unwrap_or(search_defaults.max_offers_per_bucket),
                max_airport_choices: parsed_var("MAX_AIRPORT_CHOICES")
                    .filter(|n| *n > 1)
                    .unwrap_or(search_defaults.max_airport_choices),
                max_search_attempts: parsed_var("MAX_SEARCH_ATTEMPTS")
                    .filter(|n| *n > 0)
                    .unwrap_or(search_defaults.max_search_attempts),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "PORT",
        "HOST",
        "SEARCHAPI_KEY",
        "SEARCHAPI_URL",
        "SEARCHAPI_TIMEOUT_SECS",
        "SEARCHAPI_CURRENCY",
        "MAX_OFFERS_PER_BUCKET",
        "MAX_AIRPORT_CHOICES",
        "MAX_SEARCH_ATTEMPTS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env();

        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.provider.api_key, "");
        assert_eq!(config.provider.base_url, DEFAULT_SEARCHAPI_URL);
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.search.max_offers_per_bucket, 3);
        assert_eq!(config.search.max_airport_choices, 5);
        assert_eq!(config.search.max_search_attempts, 2);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("SEARCHAPI_KEY", "abc123");
        env::set_var("SEARCHAPI_TIMEOUT_SECS", "10");
        env::set_var("MAX_OFFERS_PER_BUCKET", "5");
        env::set_var("PORT", "not-a-port");

        let config = Config::from_env();
        clear_env();

        assert_eq!(config.provider.api_key, "abc123");
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.search.max_offers_per_bucket, 5);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    #[serial]
    fn test_zero_limits_fall_back_to_defaults() {
        clear_env();
        env::set_var("SEARCHAPI_TIMEOUT_SECS", "0");
        env::set_var("MAX_SEARCH_ATTEMPTS", "0");

        let config = Config::from_env();
        clear_env();

        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.search.max_search_attempts, 2);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProviderConfig {
            api_key: "super-secret".to_string(),
            ..ProviderConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
