use chrono::NaiveDate;
use kaite_catalog::{Booking, Destination, PricingBreakdown, Trip};
use kaite_core::FormValues;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking funnel steps, in the only order they can be taken
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStep {
    SelectTrip,
    Party,
    Contact,
    Review,
    Submitted,
}

/// Everything the booking page collects, submitted in one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingForm {
    pub trip_id: Uuid,
    #[serde(default)]
    pub yacht_class: Option<String>,
    pub group_size: u32,
    #[serde(default)]
    pub guest_names: Vec<String>,
    #[serde(default)]
    pub lead_email: String,
    #[serde(default)]
    pub lead_phone: String,
}

impl FormValues for BookingForm {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "lead_email" => Some(&self.lead_email),
            "lead_phone" => Some(&self.lead_phone),
            "yacht_class" => self.yacht_class.as_deref(),
            _ => None,
        }
    }
}

/// Price request for the booking page sidebar. Either a catalog trip or a
/// destination with dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub trip_id: Option<Uuid>,
    #[serde(default)]
    pub destination: Option<Destination>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub yacht_class: Option<String>,
    pub group_size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub pricing: PricingBreakdown,
    pub trip: Trip,
}
