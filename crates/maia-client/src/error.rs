//! Error taxonomy for client operations.

use thiserror::Error;

/// Any failure of a client operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No response was received.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The server answered with status >= 400.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A success body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.as_api_error().is_some_and(ApiError::is_not_found)
    }

    pub fn is_already_exists(&self) -> bool {
        self.as_api_error().is_some_and(ApiError::is_already_exists)
    }

    pub fn is_invalid_input(&self) -> bool {
        self.as_api_error().is_some_and(ApiError::is_invalid_input)
    }

    pub fn is_server_error(&self) -> bool {
        self.as_api_error().is_some_and(ApiError::is_server_error)
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A required field was empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, format!("{} is required", field))
    }
}

/// The transport failed before a response arrived (DNS, connect, TLS, timeout).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct NetworkError {
    pub message: String,
    #[source]
    pub source: reqwest::Error,
}

impl NetworkError {
    pub fn is_timeout(&self) -> bool {
        self.source.is_timeout()
    }

    pub fn is_connect(&self) -> bool {
        self.source.is_connect()
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(source: reqwest::Error) -> Self {
        Self {
            message: format!("request failed: {}", source),
            source,
        }
    }
}

/// Resource named by a locally constructed not-found / already-exists error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: String,
    pub id: String,
}

/// Error reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status_code: u16,
    pub message: String,
    pub code: Option<String>,
    pub details: Option<String>,
    resource: Option<ResourceRef>,
}

impl ApiError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            code: None,
            details: None,
            resource: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// 404 / `NOT_FOUND` for `resource` `id`.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::for_resource(404, "NOT_FOUND", "not found", resource.into(), id.into())
    }

    /// 409 / `ALREADY_EXISTS` for `resource` `id`.
    pub fn already_exists(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::for_resource(
            409,
            "ALREADY_EXISTS",
            "already exists",
            resource.into(),
            id.into(),
        )
    }

    fn for_resource(status: u16, code: &str, what: &str, kind: String, id: String) -> Self {
        let mut err = Self::new(status, format!("{} {}: {}", kind, what, id)).with_code(code);
        err.resource = Some(ResourceRef { kind, id });
        err
    }

    /// Set only for errors built with [`ApiError::not_found`] or [`ApiError::already_exists`].
    pub fn resource(&self) -> Option<&ResourceRef> {
        self.resource.as_ref()
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == 404 || self.code.as_deref() == Some("NOT_FOUND")
    }

    pub fn is_already_exists(&self) -> bool {
        self.status_code == 409 || self.code.as_deref() == Some("ALREADY_EXISTS")
    }

    pub fn is_invalid_input(&self) -> bool {
        self.status_code == 400 || self.code.as_deref() == Some("INVALID_INPUT")
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code >= 500
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ApiError {}
