//! `FilmLookup` over the gateway's HTTP surface.
//!
//! The gateway already classifies upstream failures and answers with
//! `{"error": message, "code": CODE}`. This side only decodes that body back
//! into a `QueryFailure`. Failures reaching the gateway itself go through the
//! same classifier as upstream ones.

use serde::Deserialize;

use crate::error::{classify, ErrorKind, UpstreamError, SERVER_ERROR};
use crate::http::{path_segment, HttpRequest, HttpResponse, Transport, TransportError};
use crate::query::{FilmLookup, QueryFailure};
use crate::types::Film;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

/// Lookup that asks a running gateway.
#[derive(Debug, Clone)]
pub struct RemoteLookup<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> RemoteLookup<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get<R: serde::de::DeserializeOwned>(&self, url: String) -> Result<R, QueryFailure> {
        let request = HttpRequest::get(url);
        let response = self
            .transport
            .execute(&request)
            .map_err(|err| QueryFailure::from(classify(&err.into())))?;

        if !response.is_success() {
            return Err(decode_failure(&response));
        }
        serde_json::from_str(&response.body).map_err(|err| QueryFailure::from(classify(&UpstreamError::Decode(err))))
    }
}

impl<T: Transport> FilmLookup for RemoteLookup<T> {
    fn film(&self, id: &str) -> Result<Film, QueryFailure> {
        self.get(format!("{}/films/{}", self.base_url, path_segment(id)))
    }

    fn films(&self) -> Result<Vec<Film>, QueryFailure> {
        self.get(format!("{}/films", self.base_url))
    }
}

/// Decode the gateway's error body. Unknown codes are server errors; a body
/// that is not ours (a proxy page, say) is classified by its status alone.
fn decode_failure(response: &HttpResponse) -> QueryFailure {
    match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) => {
            let code = ErrorKind::from_code(&body.code).unwrap_or(ErrorKind::ServerError);
            let message = if body.error.is_empty() {
                SERVER_ERROR.to_string()
            } else {
                body.error
            };
            QueryFailure::new(code, message)
        }
        Err(_) => {
            tracing::debug!(status = response.status, "gateway error body did not decode");
            classify(&TransportError::from_response(response.clone()).into()).into()
        }
    }
}
