//! Tool API handlers

use crate::error::AppError;
use crate::state::AppState;
use crate::tools::ToolDefinition;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Tools list response
#[derive(Debug, Serialize)]
pub struct ToolsListResponse {
    /// Definitions in name order
    pub tools: Vec<ToolDefinition>,
    /// Number of tools
    pub count: usize,
}

/// GET /api/tools - List tool definitions
pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ToolsListResponse> {
    let tools = state.registry.list_definitions();
    Json(ToolsListResponse {
        count: tools.len(),
        tools,
    })
}

/// POST /api/tools/:name - Invoke a tool with JSON arguments
pub async fn invoke_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(arguments): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let result = state.registry.invoke(&name, arguments).await?;
    Ok(Json(result))
}
