pub mod events;

pub use events::{BookingConfirmedEvent, CatalogEvent, LeadCapturedEvent, TripAvailabilityChangedEvent};
