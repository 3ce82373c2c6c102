use async_trait::async_trait;
use chrono::NaiveDate;
use kaite_catalog::{BookedTrip, Booking, BookingError, Destination, GuestInfo, Trip};
use uuid::Uuid;

/// Trip inventory and booking log, injected into the server at startup.
///
/// Lookups return `None`/empty on no match. `book_trip` is the only mutation
/// and must be atomic per trip; the trip it returns is the state right after
/// its own decrement.
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn get_all_trips(&self) -> Vec<Trip>;

    async fn find_trip(
        &self,
        destination: Destination,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Option<Trip>;

    async fn find_by_id(&self, trip_id: Uuid) -> Option<Trip>;

    async fn list_available(&self, destination: Option<Destination>) -> Vec<Trip>;

    async fn book_trip(
        &self,
        trip_id: Uuid,
        party_size: u32,
        guest: GuestInfo,
    ) -> Result<BookedTrip, BookingError>;

    async fn bookings(&self) -> Vec<Booking>;
}
