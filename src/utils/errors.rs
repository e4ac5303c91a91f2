use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Application error carrying the HTTP status it maps to.
///
/// Client-facing statuses (4xx) echo the error message in the response body;
/// server errors (5xx) are logged in full and answered with a generic message.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, anyhow!(msg.into()))
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, anyhow!(msg.into()))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(msg.into()))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, anyhow!(msg.into()))
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, anyhow!(msg.into()))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            error!(
                status = self.status.as_u16(),
                error = ?self.error,
                "request failed"
            );
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(json!({
            "message": message,
            "error": self.status.canonical_reason().unwrap_or("Error"),
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
