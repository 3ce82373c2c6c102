use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripAvailabilityChangedEvent {
    pub trip_id: Uuid,
    pub available_spots: u32,
    pub total_spots: u32,
    pub changed_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingConfirmedEvent {
    pub booking_id: Uuid,
    pub trip_id: Uuid,
    pub party_size: u32,
    pub total_minor: i64,
    pub currency: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LeadCapturedEvent {
    pub source: String,
    pub relayed: bool,
    pub timestamp: i64,
}

/// Everything fanned out on the in-process event bus.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    AvailabilityChanged(TripAvailabilityChangedEvent),
    BookingConfirmed(BookingConfirmedEvent),
    LeadCaptured(LeadCapturedEvent),
}

impl CatalogEvent {
    /// SSE event name for this payload
    pub fn name(&self) -> &'static str {
        match self {
            CatalogEvent::AvailabilityChanged(_) => "availability_changed",
            CatalogEvent::BookingConfirmed(_) => "booking_confirmed",
            CatalogEvent::LeadCaptured(_) => "lead_captured",
        }
    }
}
