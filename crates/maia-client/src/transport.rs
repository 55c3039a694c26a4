//! HTTP transports: one async, one blocking, same contract.
//!
//! `execute` sends a single attempt; no retries, redirects, caching or rate
//! limiting.

use crate::config::ClientConfig;
use crate::error::{NetworkError, Result};
use crate::request::ApiRequest;
use crate::response;
use reqwest::StatusCode;
use serde_json::Value;

/// Async transport over `reqwest::Client`.
#[derive(Debug)]
pub(crate) struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.normalized_base_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(config.header_map()?)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(NetworkError::from)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn execute(&self, req: ApiRequest) -> Result<Option<Value>> {
        let (status, body) = self.send(req).await?;
        response::classify(status, &body)
    }

    /// Like `execute`, but a success body is dropped unparsed.
    pub async fn execute_discard(&self, req: ApiRequest) -> Result<()> {
        let (status, body) = self.send(req).await?;
        response::check_status(status, &body)
    }

    async fn send(&self, req: ApiRequest) -> Result<(StatusCode, Vec<u8>)> {
        tracing::debug!(method = %req.method, path = %req.path, "sending request");
        let mut builder = self
            .http
            .request(req.method, format!("{}{}", self.base_url, req.path));
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }
        let res = builder.send().await.map_err(NetworkError::from)?;
        let status = res.status();
        let body = res.bytes().await.map_err(NetworkError::from)?;
        Ok((status, body.to_vec()))
    }
}

/// Blocking transport over `reqwest::blocking::Client`.
#[cfg(feature = "blocking")]
#[derive(Debug)]
pub(crate) struct BlockingTransport {
    http: reqwest::blocking::Client,
    base_url: String,
}

#[cfg(feature = "blocking")]
impl BlockingTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.normalized_base_url()?;
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .default_headers(config.header_map()?)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(NetworkError::from)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn execute(&self, req: ApiRequest) -> Result<Option<Value>> {
        let (status, body) = self.send(req)?;
        response::classify(status, &body)
    }

    /// Like `execute`, but a success body is dropped unparsed.
    pub fn execute_discard(&self, req: ApiRequest) -> Result<()> {
        let (status, body) = self.send(req)?;
        response::check_status(status, &body)
    }

    fn send(&self, req: ApiRequest) -> Result<(StatusCode, Vec<u8>)> {
        tracing::debug!(method = %req.method, path = %req.path, "sending request");
        let mut builder = self
            .http
            .request(req.method, format!("{}{}", self.base_url, req.path));
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }
        let res = builder.send().map_err(NetworkError::from)?;
        let status = res.status();
        let body = res.bytes().map_err(NetworkError::from)?;
        Ok((status, body.to_vec()))
    }
}
