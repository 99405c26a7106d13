//! Runtime configuration.
//!
//! # Environment Variables
//!
//! | Setting | Primary Env Var | Fallback Env Var |
//! |---------|-----------------|------------------|
//! | Provider override | `ENSGATE_PROVIDER_URL` | `PROVIDER_URL` |
//!
//! The override is either one URL (preferred, defaults follow) or a
//! comma-separated list (replaces the defaults).

use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::provider::ProviderUrls;
use crate::retry::RetryConfig;
use crate::transport::TransportPolicy;

pub const PROVIDER_URL_ENV: &str = "ENSGATE_PROVIDER_URL";
pub const PROVIDER_URL_FALLBACK_ENV: &str = "PROVIDER_URL";

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub provider_override: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider_override: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`, so callers can supply a fixed map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let provider_override = lookup(PROVIDER_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .or_else(|| lookup(PROVIDER_URL_FALLBACK_ENV))
            .filter(|value| !value.trim().is_empty());

        Self {
            provider_override,
            ..Self::default()
        }
    }

    pub fn with_provider_override(mut self, value: impl Into<String>) -> Self {
        self.provider_override = Some(value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn provider_urls(&self) -> ProviderUrls {
        ProviderUrls::resolve(self.provider_override.as_deref())
    }

    pub fn transport_policy(&self) -> TransportPolicy {
        TransportPolicy::default()
            .with_timeout(self.timeout)
            .with_retry(RetryConfig::fixed(self.retry_delay, self.max_retries))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        for url in self.provider_urls().iter() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidProviderUrl {
                    value: url.to_owned(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn primary_env_var_wins_over_fallback() {
        let config = Config::from_lookup(lookup(&[
            (PROVIDER_URL_ENV, "https://primary.example"),
            (PROVIDER_URL_FALLBACK_ENV, "https://fallback.example"),
        ]));

        assert_eq!(config.provider_override.as_deref(), Some("https://primary.example"));
    }

    #[test]
    fn blank_primary_uses_fallback_env_var() {
        let config = Config::from_lookup(lookup(&[
            (PROVIDER_URL_ENV, "  "),
            (PROVIDER_URL_FALLBACK_ENV, "https://fallback.example"),
        ]));

        assert_eq!(config.provider_override.as_deref(), Some("https://fallback.example"));
        assert_eq!(config.provider_urls().preferred(), "https://fallback.example");
    }

    #[test]
    fn defaults_match_transport_budget() {
        let policy = Config::from_lookup(lookup(&[])).transport_policy();

        assert_eq!(policy.timeout, Duration::from_millis(10_000));
        assert_eq!(policy.retry.max_retries, 3);
        assert_eq!(policy.retry.delay_for_retry(1), Duration::from_millis(1_000));
    }

    #[test]
    fn rejects_non_http_provider() {
        let config = Config::default().with_provider_override("wss://node.example");

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidProviderUrl {
                value: String::from("wss://node.example")
            })
        );
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = Config::default().with_timeout(Duration::ZERO);

        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}
