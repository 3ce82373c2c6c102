use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use kaite_agent::{ChatMessage, ChatSession, UserProfile};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub message: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub message: ChatMessage,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat", post(send_message))
        .route("/api/chat/{session_id}", get(get_transcript))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/chat
async fn send_message(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatResponse> {
    // 1. Answer against a fresh catalog snapshot
    let message = state.agent.clip_query(&req.message);
    let trips = state.trip_repo.get_all_trips().await;
    let reply = state.agent.process_query(&message, req.profile.as_ref(), &trips);

    // 2. Record both sides of the turn, the user side as clipped
    let session_id = state
        .sessions
        .append(req.session_id, vec![ChatMessage::user(message), reply.clone()])
        .await;

    Json(ChatResponse { session_id, message: reply })
}

/// GET /api/chat/{session_id}
async fn get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ChatSession>, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Chat session not found: {}", session_id)))
}
