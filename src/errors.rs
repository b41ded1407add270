use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// The two user-visible failure kinds of the CRUD surface.
///
/// `NotFound` means the addressed id does not resolve. `Unprocessable` covers
/// everything that goes wrong while writing: constraint violations, dangling
/// foreign keys, and unexpected persistence failures, with the underlying
/// cause text attached. Any in-flight transaction has already been rolled
/// back by the time one of these propagates.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Unprocessable(String),
}

impl ApiError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound(entity)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable(message.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Unprocessable(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => {
                warn!(error = %self, "request failed validation");
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
