use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a str>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Render the JSON error body, tagging it with the request id when known.
    pub fn into_response_with(self, request_id: Option<&str>) -> Response {
        let (status, code) = self.parts();
        let message = self.to_string();

        match &self {
            AppError::Internal(err) => tracing::error!(
                request_id = request_id.unwrap_or("n/a"),
                error = %err,
                status = status.as_u16(),
                "request failed"
            ),
            other => tracing::warn!(
                request_id = request_id.unwrap_or("n/a"),
                error = %other,
                status = status.as_u16(),
                "request failed"
            ),
        }

        let body = ErrorBody {
            code,
            message: &message,
            request_id,
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_response_with(None)
    }
}
