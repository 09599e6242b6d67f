use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::github::GithubError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A required credential is absent from the server environment.
    #[error("Server missing {0}")]
    MissingConfig(&'static str),

    /// An upstream service answered with a non-success status. The status
    /// is passed through to the client; the detail is only logged.
    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// An upstream service answered 2xx but the payload was unusable.
    #[error("Upstream returned invalid data: {0}")]
    UpstreamInvalid(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Not implemented")]
    NotImplemented,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::MissingConfig(key) => {
                tracing::error!("Missing server configuration: {key}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    format!("Server missing {key}"),
                )
            }
            AppError::Upstream { status, message } => {
                tracing::warn!("Upstream error {status}: {message}");
                (
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    "UPSTREAM_ERROR",
                    format!("Upstream error {status}"),
                )
            }
            AppError::UpstreamInvalid(msg) => {
                tracing::error!("Invalid upstream payload: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "BAD_UPSTREAM",
                    "Upstream returned invalid data".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                "This endpoint is not yet implemented".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, message } => AppError::Upstream { status, message },
            LlmError::EmptyContent => {
                AppError::UpstreamInvalid("LLM returned empty content".to_string())
            }
            LlmError::Parse(e) => AppError::UpstreamInvalid(format!("LLM returned non-JSON: {e}")),
            LlmError::Http(e) => AppError::Internal(anyhow::anyhow!("LLM request failed: {e}")),
        }
    }
}

impl From<GithubError> for AppError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::Api { status, message } => AppError::Upstream { status, message },
            GithubError::Decode(msg) => {
                AppError::UpstreamInvalid(format!("GitHub content not decodable: {msg}"))
            }
            GithubError::Http(e) => {
                AppError::Internal(anyhow::anyhow!("GitHub request failed: {e}"))
            }
        }
    }
}
