//! The query boundary: look a film up, get a `Film` or a structured failure.
//!
//! # Design
//! Callers see `QueryFailure { code, message }` and nothing else. The caught
//! upstream error is classified and logged here, then dropped. `FilmLookup` is
//! the seam the card board depends on, so the board does not care whether
//! the lookup runs in-process (`FilmQuery`) or against the gateway
//! (`crate::remote::RemoteLookup`).

use serde::{Deserialize, Serialize};

use crate::client::GhibliClient;
use crate::error::{classify, DomainError, ErrorKind, UpstreamError};
use crate::http::Transport;
use crate::normalize::normalize;
use crate::types::Film;

/// A caller-visible failure: a stable code plus a human message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct QueryFailure {
    pub code: ErrorKind,
    pub message: String,
}

impl QueryFailure {
    pub fn new(code: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<DomainError> for QueryFailure {
    fn from(err: DomainError) -> Self {
        Self {
            code: err.kind,
            message: err.message,
        }
    }
}

/// Anything that can answer film lookups.
pub trait FilmLookup: Send + Sync {
    fn film(&self, id: &str) -> Result<Film, QueryFailure>;

    fn films(&self) -> Result<Vec<Film>, QueryFailure>;
}

impl<L: FilmLookup + ?Sized> FilmLookup for std::sync::Arc<L> {
    fn film(&self, id: &str) -> Result<Film, QueryFailure> {
        (**self).film(id)
    }

    fn films(&self) -> Result<Vec<Film>, QueryFailure> {
        (**self).films()
    }
}

/// In-process lookup straight against the upstream catalogue.
#[derive(Debug, Clone)]
pub struct FilmQuery<T> {
    client: GhibliClient<T>,
}

impl<T: Transport> FilmQuery<T> {
    pub fn new(client: GhibliClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GhibliClient<T> {
        &self.client
    }
}

impl<T: Transport> FilmLookup for FilmQuery<T> {
    fn film(&self, id: &str) -> Result<Film, QueryFailure> {
        self.client
            .fetch_by_id(id)
            .map(normalize)
            .map_err(|err| failure("film", &err))
    }

    fn films(&self) -> Result<Vec<Film>, QueryFailure> {
        self.client
            .fetch_all()
            .map(|records| records.into_iter().map(normalize).collect())
            .map_err(|err| failure("films", &err))
    }
}

fn failure(operation: &str, err: &UpstreamError) -> QueryFailure {
    let classified = classify(err);
    tracing::warn!(
        operation,
        code = %classified.kind,
        status = ?classified.status_code,
        error = %err,
        "upstream lookup failed"
    );
    classified.into()
}
