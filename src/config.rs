//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Production backend the web frontend talked to.
pub const DEFAULT_BASE_URL: &str = "https://textiq-smart-content-automation.onrender.com";

/// Overall timeout applied to every gateway request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BASE_URL_KEY: &str = "TEXTIQ_BASE_URL";
const TIMEOUT_KEY: &str = "TEXTIQ_TIMEOUT_SECS";

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Gateway client configuration. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, without a trailing slash.
    pub base_url: String,
    /// Fixed request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: APP_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `TEXTIQ_BASE_URL` and `TEXTIQ_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_KEY).filter(|s| !s.trim().is_empty()) {
            config = config.with_base_url(checked_base_url(&url, BASE_URL_KEY)?);
        }

        if let Some(raw) = lookup(TIMEOUT_KEY) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: TIMEOUT_KEY.into(),
                message: format!("not a number: {raw:?}"),
            })?;
            config.timeout = checked_timeout(secs, TIMEOUT_KEY)?;
        }

        Ok(config)
    }

    /// Apply command-line overrides with the same checks as the environment.
    pub fn with_overrides(
        mut self,
        base_url: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = base_url {
            self = self.with_base_url(checked_base_url(url, "--base-url")?);
        }
        if let Some(secs) = timeout_secs {
            self.timeout = checked_timeout(secs, "--timeout-secs")?;
        }
        Ok(self)
    }

    /// Join a backend path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn checked_base_url<'a>(url: &'a str, key: &str) -> Result<&'a str, ConfigError> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::InvalidValue {
            key: key.into(),
            message: format!("expected an http(s) URL, got {url:?}"),
        });
    }
    Ok(url)
}

fn checked_timeout(secs: u64, key: &str) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.into(),
            message: "timeout must be at least one second".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("textiq/"));
    }

    #[test]
    fn reads_overrides_and_trims_slash() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("TEXTIQ_BASE_URL", "http://localhost:8000/"),
            ("TEXTIQ_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn rejects_bad_values() {
        for pairs in [
            [("TEXTIQ_TIMEOUT_SECS", "soon")],
            [("TEXTIQ_TIMEOUT_SECS", "0")],
            [("TEXTIQ_BASE_URL", "localhost")],
        ] {
            assert!(ClientConfig::from_lookup(lookup_from(&pairs)).is_err());
        }
    }

    #[test]
    fn overrides_replace_environment_values() {
        let config = ClientConfig::from_lookup(lookup_from(&[("TEXTIQ_TIMEOUT_SECS", "5")]))
            .unwrap()
            .with_overrides(Some("http://127.0.0.1:9000/"), Some(2))
            .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(2));

        let untouched = ClientConfig::default().with_overrides(None, None).unwrap();
        assert_eq!(untouched, ClientConfig::default());
    }

    #[test]
    fn overrides_are_validated_like_environment() {
        let err = ClientConfig::default().with_overrides(None, Some(0)).unwrap_err();
        assert!(err.to_string().contains("--timeout-secs"));

        let err = ClientConfig::default().with_overrides(Some("localhost:8000"), None).unwrap_err();
        assert!(err.to_string().contains("--base-url"));
    }
}
