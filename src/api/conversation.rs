//! Conversation API handler

use crate::conversation::{Session, Turn};
use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::Deserialize;
use std::sync::Arc;

/// Conversation request
#[derive(Debug, Deserialize)]
pub struct ConversationRequest {
    /// Session returned by the previous turn; absent on the first turn
    #[serde(default)]
    pub session: Option<Session>,
    /// User message
    #[serde(default)]
    pub message: String,
}

/// POST /api/conversation - Advance a conversation by one message
///
/// Without a session and with a blank message this only opens the
/// conversation. Provider failures are reported inside the reply, never as an
/// HTTP error.
pub async fn converse(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConversationRequest>,
) -> Json<Turn> {
    let turn = match request.session {
        None if request.message.trim().is_empty() => state.orchestrator.start(),
        session => {
            state
                .orchestrator
                .advance(session.unwrap_or_default(), &request.message)
                .await
        }
    };

    tracing::debug!(stage = ?turn.session.stage.kind(), "Conversation advanced");
    Json(turn)
}
