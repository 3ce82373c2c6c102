use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use kaite_booking::{BookingConfirmation, BookingForm, QuoteRequest};
use kaite_catalog::PricingBreakdown;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings/quote", post(quote))
        .route("/api/bookings", post(create_booking))
}

/// POST /api/bookings/quote
async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<PricingBreakdown>, AppError> {
    let breakdown = state.bookings.quote(&req).await?;
    Ok(Json(breakdown))
}

/// POST /api/bookings
/// Runs the whole funnel; 409 when the trip can't take the party
async fn create_booking(
    State(state): State<AppState>,
    Json(form): Json<BookingForm>,
) -> Result<(StatusCode, Json<BookingConfirmation>), AppError> {
    let confirmation = state.bookings.submit(form).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}
