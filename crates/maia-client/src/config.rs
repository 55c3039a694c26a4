//! Client configuration.

use crate::error::{Result, ValidationError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header the server's auth middleware reads the API key from.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Settings applied to every request a client sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Merged over the JSON defaults; wins on conflict.
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Build from `MAIA_URL`, `MAIA_TIMEOUT_SECS` and `MAIA_API_KEY`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("MAIA_URL") {
            config.base_url = url;
        }
        if let Some(secs) = std::env::var("MAIA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(key) = std::env::var("MAIA_API_KEY") {
            config = config.with_api_key(key);
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_api_key(self, key: impl Into<String>) -> Self {
        self.with_header(API_KEY_HEADER, key)
    }

    /// Base URL without trailing slashes, checked to be absolute.
    pub(crate) fn normalized_base_url(&self) -> Result<String> {
        let trimmed = self.base_url.trim_end_matches('/');
        let parsed = url::Url::parse(trimmed).map_err(|e| {
            ValidationError::new("base_url", format!("invalid base_url {:?}: {}", trimmed, e))
        })?;
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ValidationError::new(
                "base_url",
                format!("base_url {:?} must not carry a query or fragment", trimmed),
            )
            .into());
        }
        Ok(trimmed.to_string())
    }

    /// JSON defaults with custom headers merged on top.
    pub(crate) fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ValidationError::new("headers", format!("invalid header name {:?}: {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ValidationError::new("headers", format!("invalid value for {}: {}", name, e))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}
