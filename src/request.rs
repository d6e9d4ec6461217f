//! Per-request context consumed by policies and the dispatcher.

use std::collections::HashMap;

use hyper::Method;
use hyper::header::{HeaderName, HeaderValue};
use hyper::http::HeaderMap;
use hyper::http::request::Parts;

use crate::Result;

/// Methods that are not expected to mutate state.
pub const SAFE_METHODS: [Method; 3] = [Method::GET, Method::HEAD, Method::OPTIONS];

/// Whether `method` is in the safe (read-only) set.
pub fn is_safe_method(method: &Method) -> bool {
    SAFE_METHODS.contains(method)
}

/// The incoming request as seen by the authorization layer.
///
/// Read-only for this crate; the host builds one per request and shares it
/// with the view and its policy.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method.
    pub method: Method,
    /// The request URI.
    pub uri: hyper::Uri,
    /// The request headers.
    pub headers: HeaderMap,
    /// Route parameters (e.g., {id} from path).
    pub params: HashMap<String, String>,
    /// Authenticated user, as resolved by the host.
    pub user: Option<String>,
}

impl Request {
    /// Create a request for `method` with an empty URI and no headers.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            uri: hyper::Uri::default(),
            headers: HeaderMap::new(),
            params: HashMap::new(),
            user: None,
        }
    }

    /// Build from a hyper request head.
    pub fn from_parts(parts: Parts, params: HashMap<String, String>) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            params,
            user: None,
        }
    }

    pub fn with_uri(mut self, uri: hyper::Uri) -> Self {
        self.uri = uri;
        self
    }

    /// Add a header. Names or values that are not valid header text are
    /// dropped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = HeaderName::from_bytes(name.as_bytes());
        let value = HeaderValue::from_str(value);
        if let (Ok(name), Ok(value)) = (name, value) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Whether the method is read-only.
    pub fn is_safe(&self) -> bool {
        is_safe_method(&self.method)
    }

    /// Get a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get a route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Get a required route parameter, returning BadRequest if missing.
    pub fn require_param(&self, name: &str) -> Result<&str> {
        self.param(name)
            .ok_or_else(|| crate::Error::BadRequest(format!("Missing parameter: {name}")))
    }

    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Require an authenticated user, returning Unauthorized if not present.
    pub fn require_user(&self) -> Result<&str> {
        self.user().ok_or(crate::Error::Unauthorized)
    }
}
