use async_trait::async_trait;
use chrono::NaiveDate;
use kaite_catalog::seed::default_trips;
use kaite_catalog::ledger;
use kaite_catalog::{BookedTrip, Booking, BookingError, Destination, GuestInfo, Trip};
use kaite_core::TripRepository;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::warn;
use uuid::Uuid;

/// Process-local trip inventory.
///
/// Every trip sits behind its own mutex, so bookings only contend when they
/// target the same trip. Catalog order is kept in `order`.
pub struct InMemoryTripRepository {
    order: Vec<Uuid>,
    trips: HashMap<Uuid, Arc<Mutex<Trip>>>,
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryTripRepository {
    /// A repeated id keeps its first record.
    pub fn new(trips: Vec<Trip>) -> Self {
        let mut order = Vec::with_capacity(trips.len());
        let mut by_id: HashMap<Uuid, Arc<Mutex<Trip>>> = HashMap::with_capacity(trips.len());
        for trip in trips {
            if by_id.contains_key(&trip.id) {
                warn!(trip_id = %trip.id, title = %trip.title, "Duplicate trip id, record skipped");
                continue;
            }
            order.push(trip.id);
            by_id.insert(trip.id, Arc::new(Mutex::new(trip)));
        }

        Self {
            order,
            trips: by_id,
            bookings: RwLock::new(Vec::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_trips())
    }

    async fn snapshot(&self) -> Vec<Trip> {
        let mut out = Vec::with_capacity(self.order.len());
        for id in &self.order {
            if let Some(trip) = self.trips.get(id) {
                out.push(trip.lock().await.clone());
            }
        }
        out
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn get_all_trips(&self) -> Vec<Trip> {
        self.snapshot().await
    }

    async fn find_trip(
        &self,
        destination: Destination,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Option<Trip> {
        self.snapshot()
            .await
            .into_iter()
            .find(|t| t.destination == destination && t.start_date == start_date && t.end_date == end_date)
    }

    async fn find_by_id(&self, trip_id: Uuid) -> Option<Trip> {
        let trip = self.trips.get(&trip_id)?;
        let snapshot = trip.lock().await.clone();
        Some(snapshot)
    }

    async fn list_available(&self, destination: Option<Destination>) -> Vec<Trip> {
        self.snapshot()
            .await
            .into_iter()
            .filter(|t| t.is_bookable())
            .filter(|t| destination.map_or(true, |d| t.destination == d))
            .collect()
    }

    async fn book_trip(
        &self,
        trip_id: Uuid,
        party_size: u32,
        guest: GuestInfo,
    ) -> Result<BookedTrip, BookingError> {
        let trip = self.trips.get(&trip_id).ok_or(BookingError::NotFound(trip_id))?;

        // Check and decrement under this trip's lock only
        let mut trip = trip.lock().await;
        let booked = ledger::book(&mut trip, party_size, guest)?;
        self.bookings.write().await.push(booked.booking.clone());

        Ok(booked)
    }

    async fn bookings(&self) -> Vec<Booking> {
        self.bookings.read().await.clone()
    }
}
