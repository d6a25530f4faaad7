use std::env;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Url;

static DEFAULT_API_URL: &str = "http://localhost:8080/api";
static ENV_API_URL: &str = "TASKDESK_API_URL";
static ENV_API_TIMEOUT: &str = "TASKDESK_API_TIMEOUT";

/// Where the remote task API lives and how long a single request may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    timeout: Option<Duration>,
}

impl ApiConfig {
    /// Construct [`ApiConfig`] by resolving the base URL and timeout from the provided overrides,
    /// environment variables, and defaults.
    pub fn discover(url_override: Option<String>, timeout_override: Option<u64>) -> Result<Self> {
        let raw_url = resolve_base_url(url_override);
        let timeout = match timeout_override {
            Some(seconds) => Some(seconds),
            None => timeout_from_env()?,
        };
        let config = Self::from_url(&raw_url)?;
        Ok(config.with_timeout(timeout.map(Duration::from_secs)))
    }

    /// Construct [`ApiConfig`] directly from a base URL, without a timeout.
    pub fn from_url(raw: &str) -> Result<Self> {
        let base_url = Url::parse(raw.trim())
            .with_context(|| format!("Invalid API base URL '{}'", raw.trim()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "Unsupported API URL scheme '{}': expected http or https",
                base_url.scheme()
            );
        }
        if base_url.cannot_be_a_base() {
            bail!("API URL '{}' cannot carry a path", base_url);
        }
        Ok(Self {
            base_url,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|value| !value.is_zero());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_url(DEFAULT_API_URL).expect("default API URL is valid")
    }
}

fn resolve_base_url(url_override: Option<String>) -> String {
    if let Some(url) = url_override.filter(|value| !value.trim().is_empty()) {
        return url;
    }

    if let Ok(env_url) = env::var(ENV_API_URL) {
        if !env_url.trim().is_empty() {
            return env_url;
        }
    }

    DEFAULT_API_URL.to_string()
}

fn timeout_from_env() -> Result<Option<u64>> {
    match env::var(ENV_API_TIMEOUT) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| anyhow!("{} must be a number of seconds, got '{}'", ENV_API_TIMEOUT, raw)),
        _ => Ok(None),
    }
}
