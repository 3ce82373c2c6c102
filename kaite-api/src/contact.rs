use axum::{extract::State, routing::post, Json, Router};
use kaite_core::{ContactSubmission, LeadSubmission, RelayResponse};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(submit_contact))
        .route("/api/leads", post(capture_lead))
}

/// POST /api/contact
async fn submit_contact(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> Result<Json<RelayResponse>, AppError> {
    let response = state.contact.submit_contact(&submission).await?;
    Ok(Json(response))
}

/// POST /api/leads
/// Succeeds for any valid email even when the relay is down
async fn capture_lead(
    State(state): State<AppState>,
    Json(lead): Json<LeadSubmission>,
) -> Result<Json<RelayResponse>, AppError> {
    let response = state.contact.capture_lead(&lead).await?;
    Ok(Json(response))
}
