use kaite_catalog::{BookingError, GuestInfo, PricingBreakdown, PricingEngine, PricingError, Trip};
use kaite_core::forms::{booking_contact, booking_guest};
use kaite_core::ValidationErrors;
use uuid::Uuid;

use crate::models::{BookingForm, BookingStep};

#[derive(Debug, thiserror::Error)]
pub enum FunnelError {
    #[error("Invalid booking step transition from {from:?} to {to:?}")]
    InvalidTransition { from: BookingStep, to: BookingStep },

    #[error("Trip {0} is sold out")]
    TripUnavailable(Uuid),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Booking(#[from] BookingError),
}

/// One customer's walk through the booking page.
///
/// Steps only move forward; every setter validates its own step before
/// advancing.
#[derive(Debug, Clone)]
pub struct BookingFunnel {
    step: BookingStep,
    max_group_size: u32,
    trip: Option<Trip>,
    yacht_class: Option<String>,
    guest_names: Vec<String>,
    lead_email: String,
    lead_phone: String,
    pricing: Option<PricingBreakdown>,
}

impl BookingFunnel {
    pub fn new(max_group_size: u32) -> Self {
        Self {
            step: BookingStep::SelectTrip,
            max_group_size,
            trip: None,
            yacht_class: None,
            guest_names: Vec::new(),
            lead_email: String::new(),
            lead_phone: String::new(),
            pricing: None,
        }
    }

    /// Run every step for a complete form against a trip snapshot
    pub fn from_form(form: &BookingForm, trip: Trip, engine: &PricingEngine) -> Result<Self, FunnelError> {
        let mut funnel = Self::new(engine.config().max_group_size);
        funnel.select_trip(trip, form.yacht_class.clone())?;
        funnel.set_party(form.group_size, form.guest_names.clone())?;
        funnel.set_contact(&form.lead_email, &form.lead_phone)?;
        funnel.review(engine)?;
        Ok(funnel)
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn trip(&self) -> Option<&Trip> {
        self.trip.as_ref()
    }

    pub fn party_size(&self) -> u32 {
        self.guest_names.len() as u32
    }

    pub fn pricing(&self) -> Option<&PricingBreakdown> {
        self.pricing.as_ref()
    }

    fn advance(&mut self, expected: BookingStep, to: BookingStep) -> Result<(), FunnelError> {
        if self.step != expected {
            return Err(FunnelError::InvalidTransition { from: self.step, to });
        }
        self.step = to;
        Ok(())
    }

    /// SelectTrip → Party
    pub fn select_trip(&mut self, trip: Trip, yacht_class: Option<String>) -> Result<(), FunnelError> {
        if self.step != BookingStep::SelectTrip {
            return Err(FunnelError::InvalidTransition { from: self.step, to: BookingStep::Party });
        }
        if !trip.is_bookable() {
            return Err(FunnelError::TripUnavailable(trip.id));
        }

        self.trip = Some(trip);
        self.yacht_class = yacht_class.filter(|c| !c.trim().is_empty());
        self.advance(BookingStep::SelectTrip, BookingStep::Party)
    }

    /// Party → Contact. One valid name per guest, group within limits.
    pub fn set_party(&mut self, group_size: u32, guest_names: Vec<String>) -> Result<(), FunnelError> {
        if self.step != BookingStep::Party {
            return Err(FunnelError::InvalidTransition { from: self.step, to: BookingStep::Contact });
        }

        let mut errors = ValidationErrors::new();
        if group_size < 1 || group_size > self.max_group_size {
            errors.add("group_size", format!("Group size must be between 1 and {}", self.max_group_size));
        }
        if guest_names.len() != group_size as usize {
            errors.add(
                "guest_names",
                format!("Expected {} guest names, got {}", group_size, guest_names.len()),
            );
        }
        let guest = booking_guest();
        for (i, name) in guest_names.iter().enumerate() {
            let checked = guest.validate(&serde_json::json!({ "name": name.trim() }));
            for message in checked.get("name").unwrap_or_default() {
                errors.add("guest_names", format!("Guest {}: {}", i + 1, message));
            }
        }
        errors.into_result()?;

        if let Some(trip) = &self.trip {
            if group_size > trip.available_spots {
                return Err(BookingError::InsufficientAvailability {
                    requested: group_size,
                    available: trip.available_spots,
                }
                .into());
            }
        }

        self.guest_names = guest_names.into_iter().map(|n| n.trim().to_string()).collect();
        self.advance(BookingStep::Party, BookingStep::Contact)
    }

    /// Contact → Review
    pub fn set_contact(&mut self, lead_email: &str, lead_phone: &str) -> Result<(), FunnelError> {
        if self.step != BookingStep::Contact {
            return Err(FunnelError::InvalidTransition { from: self.step, to: BookingStep::Review });
        }

        let values = serde_json::json!({
            "lead_email": lead_email.trim(),
            "lead_phone": lead_phone.trim(),
        });
        booking_contact().check(&values)?;

        self.lead_email = lead_email.trim().to_string();
        self.lead_phone = lead_phone.trim().to_string();
        self.advance(BookingStep::Contact, BookingStep::Review)
    }

    /// Price the selection. Can be repeated while on the review step.
    pub fn review(&mut self, engine: &PricingEngine) -> Result<&PricingBreakdown, FunnelError> {
        if self.step != BookingStep::Review {
            return Err(FunnelError::InvalidTransition { from: self.step, to: BookingStep::Review });
        }
        let trip = self.trip.as_ref().ok_or(FunnelError::InvalidTransition {
            from: self.step,
            to: BookingStep::Review,
        })?;

        let breakdown = engine.quote_trip(trip, self.yacht_class.as_deref(), self.party_size())?;
        Ok(self.pricing.insert(breakdown))
    }

    /// Review → Submitted, once a price has been shown
    pub fn submit(&mut self) -> Result<(), FunnelError> {
        if self.pricing.is_none() {
            return Err(FunnelError::InvalidTransition { from: self.step, to: BookingStep::Submitted });
        }
        self.advance(BookingStep::Review, BookingStep::Submitted)
    }

    pub fn guest_info(&self) -> GuestInfo {
        GuestInfo::new(self.guest_names.clone(), self.lead_email.clone(), self.lead_phone.clone())
    }
}
