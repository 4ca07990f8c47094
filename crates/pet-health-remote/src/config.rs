//! Connection settings for the hosted backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_BASE_URL: &str = "PET_HEALTH_API_URL";
pub const ENV_ANON_KEY: &str = "PET_HEALTH_ANON_KEY";
pub const ENV_TIMEOUT_SECS: &str = "PET_HEALTH_TIMEOUT_SECS";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum RemoteConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Public API key sent as `apikey` on every request
    pub anon_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RemoteConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `PET_HEALTH_API_URL`, `PET_HEALTH_ANON_KEY` and optionally
    /// `PET_HEALTH_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, RemoteConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RemoteConfigError> {
        let base_url = lookup(ENV_BASE_URL).ok_or(RemoteConfigError::Missing(ENV_BASE_URL))?;
        let anon_key = lookup(ENV_ANON_KEY).ok_or(RemoteConfigError::Missing(ENV_ANON_KEY))?;
        let mut config = Self::new(base_url, anon_key);
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|_| RemoteConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS.to_string(),
                value: raw,
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RemoteConfigError> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(RemoteConfigError::InvalidValue {
                key: "base_url".into(),
                value: self.base_url.clone(),
            });
        }
        if self.anon_key.trim().is_empty() {
            return Err(RemoteConfigError::Missing("anon_key"));
        }
        if self.timeout_secs == 0 {
            return Err(RemoteConfigError::InvalidValue {
                key: "timeout_secs".into(),
                value: "0".into(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub(crate) fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_json_defaults_timeout() {
        let config = RemoteConfig::from_json(r#"{"base_url": "https://pets.example.com/", "anon_key": "anon"}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.root(), "https://pets.example.com");
    }

    #[test]
    fn test_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://pets.example.com"),
            (ENV_ANON_KEY, "anon"),
            (ENV_TIMEOUT_SECS, "30"),
        ]
        .into();
        let config = RemoteConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.timeout_secs, 30);

        let missing = RemoteConfig::from_lookup(|k| (k == ENV_BASE_URL).then(|| "https://x".to_string()));
        assert!(matches!(missing, Err(RemoteConfigError::Missing(ENV_ANON_KEY))));
    }

    #[test]
    fn test_rejects_bad_url() {
        let result = RemoteConfig::from_json(r#"{"base_url": "pets.example.com", "anon_key": "anon"}"#);
        assert!(matches!(result, Err(RemoteConfigError::InvalidValue { .. })));
    }
}
