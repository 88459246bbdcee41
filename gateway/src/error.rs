use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ghibli_core::error::SERVER_ERROR;
use ghibli_core::{ErrorKind, QueryFailure};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Every variant renders as `{"error": message, "code": CODE}` so clients can
/// branch on `code` without parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A classified failure from the query boundary.
    #[error(transparent)]
    Query(#[from] QueryFailure),

    /// The blocking lookup task died before answering.
    #[error("lookup task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type AppResult<T> = Result<T, AppError>;

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::NetworkError => StatusCode::BAD_GATEWAY,
        ErrorKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AppError::Query(failure) => (failure.code, failure.message),
            AppError::Join(err) => {
                tracing::error!(error = %err, "lookup task failed");
                (ErrorKind::ServerError, SERVER_ERROR.to_string())
            }
        };

        let body = json!({
            "error": message,
            "code": code.code(),
        });

        (status_for(code), axum::Json(body)).into_response()
    }
}
