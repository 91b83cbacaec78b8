//! Error types and error handling for the HTTP surface
//!
//! Every error carries a stable `kind` and a `retryable` flag so callers can
//! tell "try again later" apart from "fix the request".

use crate::search::SearchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Resolver or executor failure
    #[error(transparent)]
    Search(#[from] SearchError),

    /// No tool registered under this name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool arguments do not match the tool's schema
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable snake_case name of the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Search(e) => e.kind(),
            AppError::ToolNotFound(_) => "tool_not_found",
            AppError::InvalidArguments(_) => "invalid_input",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Whether the same request may succeed later
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Search(e) if e.is_retryable())
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Search(SearchError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Search(SearchError::UpstreamUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Search(SearchError::Authentication(_))
            | AppError::Search(SearchError::UpstreamContractViolation(_)) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::ToolNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidArguments(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(kind = self.kind(), error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "retryable": self.is_retryable(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
