use chrono::{DateTime, Utc};
use kaite_shared::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trip::Trip;

/// Guest details captured by the booking form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestInfo {
    pub guest_names: Vec<String>,
    pub lead_email: Masked<String>,
    pub lead_phone: Masked<String>,
}

impl GuestInfo {
    pub fn new(guest_names: Vec<String>, lead_email: impl Into<String>, lead_phone: impl Into<String>) -> Self {
        Self {
            guest_names,
            lead_email: Masked::new(lead_email.into()),
            lead_phone: Masked::new(lead_phone.into()),
        }
    }
}

/// A confirmed booking. Created together with the availability decrement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub guest_names: Vec<String>,
    pub lead_email: Masked<String>,
    pub lead_phone: Masked<String>,
    pub party_size: u32,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(trip_id: Uuid, party_size: u32, guest: GuestInfo) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_id,
            guest_names: guest.guest_names,
            lead_email: guest.lead_email,
            lead_phone: guest.lead_phone,
            party_size,
            created_at: Utc::now(),
        }
    }
}

/// Reasons a booking can be refused. Returned, never panicked.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Trip not found: {0}")]
    NotFound(Uuid),

    #[error("Insufficient availability: requested {requested}, available {available}")]
    InsufficientAvailability { requested: u32, available: u32 },

    #[error("Invalid party size: {0}")]
    InvalidPartySize(u32),
}

impl BookingError {
    /// Stable machine-readable reason
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::NotFound(_) => "not_found",
            BookingError::InsufficientAvailability { .. } => "insufficient_availability",
            BookingError::InvalidPartySize(_) => "invalid_party_size",
        }
    }
}

/// A booking together with its trip as it stood right after the decrement
#[derive(Debug, Clone)]
pub struct BookedTrip {
    pub booking: Booking,
    pub trip: Trip,
}

/// Book `party_size` spots on `trip`. On error the trip is unchanged.
///
/// The caller holds whatever lock guards `trip`; the returned snapshot is
/// taken under it.
pub fn book(trip: &mut Trip, party_size: u32, guest: GuestInfo) -> Result<BookedTrip, BookingError> {
    trip.reserve(party_size)?;

    let booking = Booking::new(trip.id, party_size, guest);
    tracing::info!(
        booking_id = %booking.id,
        trip_id = %trip.id,
        party_size,
        remaining = trip.available_spots,
        "Trip booked"
    );

    Ok(BookedTrip { booking, trip: trip.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::Destination;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trip(spots: u32) -> Trip {
        Trip::new(Destination::Caribbean, "Grenadines Kite Safari", date(2027, 2, 6), date(2027, 2, 13), spots, 249000, "EUR").unwrap()
    }

    fn guest(n: usize) -> GuestInfo {
        GuestInfo::new((0..n).map(|i| format!("Guest {}", i + 1)).collect(), "lead@example.com", "+49 170 0000000")
    }

    #[test]
    fn test_booking_lifecycle() {
        let mut trip = trip(6);

        let booked = book(&mut trip, 2, guest(2)).unwrap();
        assert_eq!(booked.booking.party_size, 2);
        assert_eq!(booked.booking.trip_id, trip.id);
        assert_eq!(booked.booking.guest_names, vec!["Guest 1", "Guest 2"]);
        assert_eq!(booked.trip.available_spots, 4);
        assert_eq!(trip.available_spots, 4);
    }

    #[test]
    fn test_overbooking_is_rejected_without_mutation() {
        let mut trip = trip(4);

        let err = book(&mut trip, 5, guest(5)).unwrap_err();
        assert_eq!(err, BookingError::InsufficientAvailability { requested: 5, available: 4 });
        assert_eq!(err.code(), "insufficient_availability");
        assert_eq!(trip.available_spots, 4);

        // exact fit still works
        let booked = book(&mut trip, 4, guest(4)).unwrap();
        assert_eq!(booked.trip.available_spots, 0);
        assert!(!booked.trip.is_bookable());
        assert!(trip.available_spots <= trip.total_spots);
    }

    #[test]
    fn test_invalid_party_size() {
        let mut trip = trip(4);
        let err = book(&mut trip, 0, guest(0)).unwrap_err();
        assert_eq!(err.code(), "invalid_party_size");
        assert_eq!(BookingError::NotFound(trip.id).code(), "not_found");
        assert_eq!(trip.available_spots, 4);
    }
}
