//! API module
//!
//! HTTP request handlers and the route table.

pub mod conversation;
pub mod tools;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
    /// Human-readable message
    pub message: String,
}

/// GET /api/health - Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Flight search backend is healthy".to_string(),
    })
}

/// Route table without middleware
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/tools", get(tools::list_tools))
        .route("/api/tools/:name", post(tools::invoke_tool))
        .route("/api/conversation", post(conversation::converse))
        .with_state(state)
}
