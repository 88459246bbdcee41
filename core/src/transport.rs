//! Blocking `Transport` backed by `ureq`.

use std::time::Duration;

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError, ECONNREFUSED, ENOTFOUND, ETIMEDOUT};

/// Production transport. Status codes are returned as data; only socket,
/// TLS, and protocol failures before a status arrives become
/// `TransportError`s.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Bound every request by `timeout`, connect through body.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.get(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let mut response = builder.call().map_err(transport_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        // The status is already in hand; a body that will not read or is not
        // UTF-8 must not turn this into a missing response.
        let body = match response.body_mut().read_to_vec() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                tracing::debug!(url = %request.url, status, error = %err, "response body unreadable");
                String::new()
            }
        };

        tracing::debug!(url = %request.url, status, "upstream responded");
        Ok(HttpResponse { status, headers, body })
    }
}

/// Map a ureq failure onto the transport codes the classifier understands.
fn transport_error(err: ureq::Error) -> TransportError {
    let code = match &err {
        ureq::Error::HostNotFound => Some(ENOTFOUND),
        ureq::Error::ConnectionFailed => Some(ECONNREFUSED),
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::ConnectionRefused => Some(ECONNREFUSED),
        ureq::Error::Timeout(_) => Some(ETIMEDOUT),
        _ => None,
    };
    tracing::debug!(error = %err, ?code, "transport failure");
    TransportError::no_response(err.to_string(), code)
}
