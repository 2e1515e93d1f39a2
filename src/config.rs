//! Client configuration.
//!
//! Defaults, then environment variables, then command-line flags, each
//! layer overriding the previous one.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `AGENT_STREAM_URL` | `base_url` |
//! | `AGENT_STREAM_AGENT` | `agent_id` |
//! | `AGENT_STREAM_SESSION` | `session_id` |
//! | `AGENT_STREAM_CONNECT_TIMEOUT_SECS` | `connect_timeout` (`0` disables) |
//! | `AGENT_STREAM_LOG` | `log_filter` |

use std::time::Duration;
use thiserror::Error;

pub const ENV_URL: &str = "AGENT_STREAM_URL";
pub const ENV_AGENT: &str = "AGENT_STREAM_AGENT";
pub const ENV_SESSION: &str = "AGENT_STREAM_SESSION";
pub const ENV_CONNECT_TIMEOUT: &str = "AGENT_STREAM_CONNECT_TIMEOUT_SECS";
pub const ENV_LOG: &str = "AGENT_STREAM_LOG";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_AGENT_ID: &str = "assistant";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("base URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("agent id must not be empty")]
    EmptyAgentId,

    #[error("invalid AGENT_STREAM_CONNECT_TIMEOUT_SECS value '{0}': expected whole seconds")]
    InvalidTimeout(String),
}

/// Settings for talking to an agent backend.
///
/// # Example
///
/// ```ignore
/// use agent_stream::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://agents.example.com")
///     .with_agent_id("support");
/// config.validate()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without the `/api/v1/a2a` path
    pub base_url: String,
    /// Agent to address
    pub agent_id: String,
    /// Conversation to continue; `None` starts a new one
    pub session_id: Option<String>,
    /// Give up connecting after this long; `None` waits indefinitely
    pub connect_timeout: Option<Duration>,
    /// `tracing-subscriber` filter directive
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            agent_id: DEFAULT_AGENT_ID.to_string(),
            session_id: None,
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Defaults overridden by `AGENT_STREAM_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_URL) {
            config.base_url = url;
        }
        if let Some(agent) = get(ENV_AGENT) {
            config.agent_id = agent;
        }
        if let Some(session) = get(ENV_SESSION) {
            config.session_id = Some(session);
        }
        if let Some(secs) = get(ENV_CONNECT_TIMEOUT) {
            config.connect_timeout = parse_timeout(&secs)?;
        }
        if let Some(filter) = get(ENV_LOG) {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Check the settings before any request is made.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(self.base_url.clone()));
        }
        if self.agent_id.trim().is_empty() {
            return Err(ConfigError::EmptyAgentId);
        }
        Ok(())
    }
}

/// Whole seconds; `0` disables the timeout.
pub fn parse_timeout(value: &str) -> Result<Option<Duration>, ConfigError> {
    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout(value.to_string()))?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.agent_id, "assistant");
        assert_eq!(config.session_id, None);
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.log_filter, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .with_base_url("https://agents.example.com")
            .with_agent_id("support")
            .with_session_id(Some("s-1".to_string()))
            .with_connect_timeout(None)
            .with_log_filter("debug");
        assert_eq!(config.base_url, "https://agents.example.com");
        assert_eq!(config.agent_id, "support");
        assert_eq!(config.session_id.as_deref(), Some("s-1"));
        assert_eq!(config.connect_timeout, None);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "https://a.example"),
            (ENV_AGENT, "quiz"),
            (ENV_SESSION, "abc"),
            (ENV_CONNECT_TIMEOUT, "3"),
            (ENV_LOG, "agent_stream=debug"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://a.example");
        assert_eq!(config.agent_id, "quiz");
        assert_eq!(config.session_id.as_deref(), Some("abc"));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.log_filter, "agent_stream=debug");
    }

    #[test]
    fn test_from_lookup_ignores_empty_values() {
        let config =
            ClientConfig::from_lookup(lookup(&[(ENV_URL, ""), (ENV_AGENT, "  ")])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_timeout_parsing() {
        assert_eq!(parse_timeout("0").unwrap(), None);
        assert_eq!(parse_timeout(" 15 ").unwrap(), Some(Duration::from_secs(15)));
        assert_eq!(
            parse_timeout("soon").unwrap_err(),
            ConfigError::InvalidTimeout("soon".to_string())
        );
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_CONNECT_TIMEOUT, "-1")])).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let err = ClientConfig::default()
            .with_base_url("not a url")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = ClientConfig::default()
            .with_base_url("ftp://example.com")
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedScheme("ftp://example.com".to_string()));
    }

    #[test]
    fn test_validate_rejects_empty_agent() {
        let err = ClientConfig::default().with_agent_id(" ").validate().unwrap_err();
        assert_eq!(err, ConfigError::EmptyAgentId);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::InvalidTimeout("x".to_string()).to_string(),
            "invalid AGENT_STREAM_CONNECT_TIMEOUT_SECS value 'x': expected whole seconds"
        );
    }
}
