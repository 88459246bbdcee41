//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `GhibliClient` builds
//! `HttpRequest` values and parses `HttpResponse` values; the actual round-trip
//! goes through a `Transport` injected at construction, so the client stays
//! deterministic under test and any HTTP stack can sit behind it.
//!
//! A `Transport` hands back every HTTP status as data. Turning a non-2xx status
//! into a `TransportError` is the client's job, which keeps the
//! "response received" and "no response at all" cases distinct for the
//! classifier.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that cannot appear raw inside one URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode `value` for use as a single path segment.
pub fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Transport code for a refused connection.
pub const ECONNREFUSED: &str = "ECONNREFUSED";

/// Transport code for a host that could not be resolved.
pub const ENOTFOUND: &str = "ENOTFOUND";

/// Transport code for a request that ran out of time.
pub const ETIMEDOUT: &str = "ETIMEDOUT";

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// A JSON GET against `url`.
    pub fn get(url: String) -> Self {
        Self {
            url,
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A failure at the transport layer.
///
/// Either no response arrived at all (`response` is `None`, `code` may name
/// the socket-level condition) or the server answered with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub code: Option<String>,
    pub response: Option<HttpResponse>,
}

impl TransportError {
    /// The server answered, but with a status the caller does not accept.
    pub fn from_response(response: HttpResponse) -> Self {
        let code = if response.status >= 500 {
            "ERR_BAD_RESPONSE"
        } else {
            "ERR_BAD_REQUEST"
        };
        Self {
            message: format!("Request failed with status code {}", response.status),
            code: Some(code.to_string()),
            response: Some(response),
        }
    }

    /// The request never produced a response.
    pub fn no_response(message: impl Into<String>, code: Option<&str>) -> Self {
        Self {
            message: message.into(),
            code: code.map(str::to_string),
            response: None,
        }
    }

    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

/// Executes a request and returns the response, whatever its status.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
