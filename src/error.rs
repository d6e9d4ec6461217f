//! Error types with HTTP status code mapping.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// Error type for warrant operations.
///
/// Two kinds matter to callers: authorization denials raised by policy
/// hooks ([`Error::Forbidden`]) and setup faults in the host view
/// ([`Error::ImproperlyConfigured`]). Everything else is plumbing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Authorization errors
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized")]
    Unauthorized,

    // Data errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    // Setup errors
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // System errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Deny the current checkpoint with a reason.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Error::Forbidden(reason.into())
    }

    /// Whether this error is an authorization denial rather than a fault.
    pub fn is_denial(&self) -> bool {
        matches!(self, Error::Forbidden(_) | Error::Unauthorized)
    }

    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,

            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,

            // Setup errors -> 500 (should be caught before production)
            Error::ImproperlyConfigured(_) | Error::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            Error::Io(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert error into HTTP response.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!("Internal error: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = serde_json::json!({
            "error": message
        });

        let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
        *response.status_mut() = status;
        response.headers_mut().insert(
            hyper::header::CONTENT_TYPE,
            hyper::header::HeaderValue::from_static("application/json"),
        );
        response
    }
}

/// Result type alias using warrant's Error.
pub type Result<T> = std::result::Result<T, Error>;
