//! Server configuration
//!
//! Defines the configurable parameters of the dashboard server: where it
//! listens, how it reaches the analysis model, and how much it accepts per
//! upload.

use std::time::Duration;

use sentinel_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// API key for the analysis model; empty means analysis calls fail
    pub api_key: String,

    /// Analysis model name
    pub model: String,

    /// Base URL of the model API
    pub api_base_url: String,

    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,

    /// Number of pipeline-output lines kept
    pub log_capacity: usize,

    /// Optional limit on the analysis call; none by default
    pub analysis_timeout: Option<Duration>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(api_key: String) -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
            log_capacity: 10,
            analysis_timeout: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognised environment variables:
    /// - GEMINI_API_KEY or API_KEY (optional, analysis fails without it)
    /// - SENTINEL_BIND_ADDR (optional, default: 0.0.0.0:8080)
    /// - SENTINEL_MODEL (optional, default: gemini-3-pro-preview)
    /// - GEMINI_BASE_URL (optional)
    /// - SENTINEL_MAX_UPLOAD_MB (optional, default: 25)
    /// - SENTINEL_LOG_CAPACITY (optional, default: 10)
    /// - SENTINEL_ANALYSIS_TIMEOUT (optional, seconds, default: unlimited)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .unwrap_or_default();

        let mut config = Self::new(api_key.trim().to_string());

        if let Some(addr) = lookup("SENTINEL_BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Some(model) = lookup("SENTINEL_MODEL") {
            config.model = model;
        }

        if let Some(url) = lookup("GEMINI_BASE_URL") {
            config.api_base_url = url;
        }

        if let Some(mb) = lookup("SENTINEL_MAX_UPLOAD_MB").and_then(|s| s.parse::<usize>().ok()) {
            config.max_upload_bytes = mb * 1024 * 1024;
        }

        if let Some(capacity) = lookup("SENTINEL_LOG_CAPACITY").and_then(|s| s.parse::<usize>().ok())
        {
            config.log_capacity = capacity;
        }

        config.analysis_timeout = lookup("SENTINEL_ANALYSIS_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        config
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.model.is_empty() {
            anyhow::bail!("model cannot be empty");
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            anyhow::bail!("api_base_url must start with http:// or https://");
        }

        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than 0");
        }

        if self.log_capacity == 0 {
            anyhow::bail!("log_capacity must be greater than 0");
        }

        if self.analysis_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("analysis_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.log_capacity, 10);
        assert!(config.analysis_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_KEY", "fallback"),
            ("SENTINEL_BIND_ADDR", "127.0.0.1:9000"),
            ("SENTINEL_MAX_UPLOAD_MB", "5"),
            ("SENTINEL_ANALYSIS_TIMEOUT", "90"),
            ("SENTINEL_LOG_CAPACITY", "not-a-number"),
        ]));

        assert_eq!(config.api_key, "fallback");
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.analysis_timeout, Some(Duration::from_secs(90)));
        assert_eq!(config.log_capacity, 10);
    }

    #[test]
    fn test_gemini_key_takes_precedence() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", " primary "),
            ("API_KEY", "fallback"),
        ]));
        assert_eq!(config.api_key, "primary");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.api_base_url = "generativelanguage.googleapis.com".to_string();
        assert!(config.validate().is_err());
        config.api_base_url = DEFAULT_BASE_URL.to_string();

        config.log_capacity = 0;
        assert!(config.validate().is_err());
        config.log_capacity = 10;

        config.analysis_timeout = Some(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
