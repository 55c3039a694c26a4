//! Response classification shared by both transports.

use crate::error::{ApiError, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Turn a received status and body into parsed JSON (`None` when the body is
/// empty) or an [`ApiError`] for status >= 400.
pub(crate) fn classify(status: StatusCode, body: &[u8]) -> Result<Option<Value>> {
    check_status(status, body)?;
    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(body)?))
}

/// Status check alone: success bodies are never parsed.
pub(crate) fn check_status(status: StatusCode, body: &[u8]) -> Result<()> {
    if status.as_u16() >= 400 {
        let err = api_error(status.as_u16(), body);
        tracing::debug!(status = err.status_code, code = ?err.code, "request failed");
        return Err(err.into());
    }
    Ok(())
}

fn api_error(status: u16, body: &[u8]) -> ApiError {
    let fallback = || format!("HTTP {}", status);
    match serde_json::from_slice::<Value>(body) {
        Ok(json) => {
            let field = |name: &str| json.get(name).and_then(Value::as_str).map(str::to_string);
            let mut err = ApiError::new(status, field("error").unwrap_or_else(fallback));
            err.code = field("code");
            err.details = field("details");
            err
        }
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            if text.is_empty() {
                ApiError::new(status, fallback())
            } else {
                ApiError::new(status, text.into_owned())
            }
        }
    }
}

/// Decode a parsed body into a model type.
pub(crate) fn decode<T: DeserializeOwned>(value: Option<Value>) -> Result<T> {
    Ok(serde_json::from_value(value.unwrap_or(Value::Null))?)
}
