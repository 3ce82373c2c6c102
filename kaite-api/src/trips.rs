use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use futures_util::stream::{Stream, StreamExt};
use kaite_catalog::{Destination, Trip, TripStatus};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListTripsQuery {
    pub destination: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindTripQuery {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Trip record plus the derived fields the website renders
#[derive(Debug, Serialize)]
pub struct TripView {
    #[serde(flatten)]
    pub trip: Trip,
    pub status: TripStatus,
    pub nights: i64,
    pub discounted_price_minor: i64,
    pub savings_minor: i64,
}

impl TripView {
    fn new(trip: Trip, low_threshold: u32) -> Self {
        Self {
            status: trip.status_with_threshold(low_threshold),
            nights: trip.nights(),
            discounted_price_minor: trip.discounted_price(),
            savings_minor: trip.savings(),
            trip,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/trips", get(list_trips))
        .route("/api/trips/find", get(find_trip))
        .route("/api/trips/stream", get(stream_events))
        .route("/api/trips/{id}", get(get_trip))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/trips?destination=
async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<ListTripsQuery>,
) -> Result<Json<Vec<TripView>>, AppError> {
    let destination = query
        .destination
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(str::parse::<Destination>)
        .transpose()?;

    let trips = state
        .trip_repo
        .get_all_trips()
        .await
        .into_iter()
        .filter(|t| destination.map_or(true, |d| t.destination == d))
        .map(|t| TripView::new(t, state.low_availability_threshold))
        .collect();

    Ok(Json(trips))
}

/// GET /api/trips/find?destination&start_date&end_date
async fn find_trip(
    State(state): State<AppState>,
    Query(query): Query<FindTripQuery>,
) -> Result<Json<TripView>, AppError> {
    let destination: Destination = query.destination.parse()?;

    let trip = state
        .trip_repo
        .find_trip(destination, query.start_date, query.end_date)
        .await
        .ok_or_else(|| {
            AppError::NotFoundError(format!(
                "No {} trip from {} to {}",
                destination, query.start_date, query.end_date
            ))
        })?;

    Ok(Json(TripView::new(trip, state.low_availability_threshold)))
}

/// GET /api/trips/{id}
async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripView>, AppError> {
    let trip = state
        .trip_repo
        .find_by_id(trip_id)
        .await
        .ok_or_else(|| AppError::NotFoundError(format!("Trip not found: {}", trip_id)))?;

    Ok(Json(TripView::new(trip, state.low_availability_threshold)))
}

/// GET /api/trips/stream
/// Availability and booking events as server-sent events
async fn stream_events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => Event::default().event(event.name()).json_data(&event).ok().map(Ok),
            // lagged subscribers skip what they missed
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
