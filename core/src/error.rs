//! Error types and the upstream error classifier.
//!
//! # Design
//! The upstream client never interprets failures; it hands back an
//! `UpstreamError` as it was caught. `classify` is the single place that turns
//! one into a `DomainError`, a closed `kind` plus a human message. Each
//! `ErrorKind` has a stable machine-readable code that survives every boundary
//! (`NOT_FOUND`, `SERVICE_UNAVAILABLE`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::{TransportError, ECONNREFUSED, ENOTFOUND};

pub const FILM_NOT_FOUND: &str = "Film not found";
pub const SERVICE_UNAVAILABLE: &str = "Studio Ghibli API is currently unavailable";
pub const NETWORK_ERROR: &str = "Network error occurred while fetching data";
pub const SERVER_ERROR: &str = "Server error";

/// The closed set of failure kinds callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The requested film does not exist upstream.
    NotFound,
    /// The upstream answered with a server-side failure.
    ServiceUnavailable,
    /// No upstream response could be obtained.
    NetworkError,
    /// Anything else, including bugs on our side.
    ServerError,
}

impl ErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ServerError => "SERVER_ERROR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NOT_FOUND" => Some(Self::NotFound),
            "SERVICE_UNAVAILABLE" => Some(Self::ServiceUnavailable),
            "NETWORK_ERROR" => Some(Self::NetworkError),
            "SERVER_ERROR" => Some(Self::ServerError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A classified upstream failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct DomainError {
    pub kind: ErrorKind,
    pub message: String,
    pub status_code: Option<u16>,
}

impl DomainError {
    fn new(kind: ErrorKind, message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code,
        }
    }
}

/// Whatever the upstream client caught, unclassified.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Failure at the HTTP layer: no response, or a non-2xx one.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 2xx response whose body did not decode into the expected shape.
    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Any other failure that did not come from the transport.
    #[error("{0}")]
    Internal(String),
}

/// Classify a caught upstream error. Rules apply in order:
///
/// 1. status 404 is `NotFound`
/// 2. status >= 500 is `ServiceUnavailable`
/// 3. no response, or a refused / unresolvable host, is `NetworkError`
/// 4. any other transport error is `ServerError` with the transport's message
/// 5. a non-transport error is `ServerError` with its own message
pub fn classify(error: &UpstreamError) -> DomainError {
    match error {
        UpstreamError::Transport(err) => classify_transport(err),
        other => DomainError::new(ErrorKind::ServerError, message_or_default(&other.to_string()), None),
    }
}

fn classify_transport(err: &TransportError) -> DomainError {
    let status = err.status();

    if status == Some(404) {
        return DomainError::new(ErrorKind::NotFound, FILM_NOT_FOUND, status);
    }

    if matches!(status, Some(s) if s >= 500) {
        return DomainError::new(ErrorKind::ServiceUnavailable, SERVICE_UNAVAILABLE, status);
    }

    if err.response.is_none() || err.has_code(ECONNREFUSED) || err.has_code(ENOTFOUND) {
        return DomainError::new(ErrorKind::NetworkError, NETWORK_ERROR, None);
    }

    DomainError::new(ErrorKind::ServerError, message_or_default(&err.message), status)
}

fn message_or_default(message: &str) -> String {
    if message.is_empty() {
        SERVER_ERROR.to_string()
    } else {
        message.to_string()
    }
}
