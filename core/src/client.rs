//! Upstream catalogue client.
//!
//! # Design
//! `GhibliClient` holds a `base_url` and an injected `Transport`. Each call is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`; `fetch_*` glues the two
//! around exactly one `Transport::execute`. Failures are returned as caught,
//! classification happens in [`crate::error::classify`].

use crate::error::UpstreamError;
use crate::http::{path_segment, HttpRequest, HttpResponse, Transport, TransportError};
use crate::types::FilmRecord;

/// Public Studio Ghibli catalogue.
pub const DEFAULT_BASE_URL: &str = "https://ghibliapi.vercel.app";

/// Client for `GET {base_url}/films` and `GET {base_url}/films/{id}`.
#[derive(Debug, Clone)]
pub struct GhibliClient<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> GhibliClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_base_url(transport, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_films(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/films", self.base_url))
    }

    pub fn build_get_film(&self, id: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/films/{}", self.base_url, path_segment(id)))
    }

    pub fn parse_list_films(&self, response: HttpResponse) -> Result<Vec<FilmRecord>, UpstreamError> {
        let response = check_status(response)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    pub fn parse_get_film(&self, response: HttpResponse) -> Result<FilmRecord, UpstreamError> {
        let response = check_status(response)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// One GET for one film.
    pub fn fetch_by_id(&self, id: &str) -> Result<FilmRecord, UpstreamError> {
        let request = self.build_get_film(id);
        tracing::debug!(url = %request.url, "fetching film");
        let response = self.transport.execute(&request)?;
        self.parse_get_film(response)
    }

    /// One GET for the whole catalogue.
    pub fn fetch_all(&self) -> Result<Vec<FilmRecord>, UpstreamError> {
        let request = self.build_list_films();
        tracing::debug!(url = %request.url, "fetching all films");
        let response = self.transport.execute(&request)?;
        self.parse_list_films(response)
    }
}

/// Anything outside 2xx is a transport error carrying the response.
fn check_status(response: HttpResponse) -> Result<HttpResponse, TransportError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(TransportError::from_response(response))
    }
}
