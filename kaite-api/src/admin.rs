use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::{DateTime, Utc};
use kaite_catalog::Booking;
use serde::Serialize;
use uuid::Uuid;

use crate::{middleware::AdminClaims, state::AppState};

/// Booking row for the back office, contact details partially redacted
#[derive(Debug, Serialize)]
pub struct AdminBookingView {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub guest_names: Vec<String>,
    pub lead_email: String,
    pub lead_phone: String,
    pub party_size: u32,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for AdminBookingView {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            trip_id: booking.trip_id,
            lead_email: booking.lead_email.redacted(),
            lead_phone: booking.lead_phone.redacted(),
            guest_names: booking.guest_names,
            party_size: booking.party_size,
            created_at: booking.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub count: usize,
    pub bookings: Vec<AdminBookingView>,
}

/// Routes mounted behind `admin_auth_middleware`
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/admin/bookings", get(list_bookings))
}

/// GET /api/admin/bookings
async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
) -> Json<BookingListResponse> {
    let bookings: Vec<AdminBookingView> = state
        .trip_repo
        .bookings()
        .await
        .into_iter()
        .map(AdminBookingView::from)
        .collect();
    tracing::info!("Admin {} listed {} bookings", claims.sub, bookings.len());

    Json(BookingListResponse { count: bookings.len(), bookings })
}
