pub mod trip;
pub mod ledger;
pub mod pricing;
pub mod kitespot;
pub mod merch;
pub mod seed;

pub use trip::{Destination, Trip, TripError, TripStatus};
pub use ledger::{BookedTrip, Booking, BookingError, GuestInfo};
pub use pricing::{LineItem, PricingBreakdown, PricingConfig, PricingEngine, PricingError, PricingRequest};
pub use kitespot::{KiteSpot, SkillLevel, WaterType, WindRange};
pub use merch::{MerchCatalog, MerchCategory, MerchProduct};
