use chrono::Utc;
use kaite_catalog::pricing::nights_between;
use kaite_catalog::{BookedTrip, BookingError, PricingBreakdown, PricingEngine, PricingRequest};
use kaite_core::{TripRepository, ValidationErrors};
use kaite_shared::models::{BookingConfirmedEvent, CatalogEvent, TripAvailabilityChangedEvent};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::funnel::{BookingFunnel, FunnelError};
use crate::models::{BookingConfirmation, BookingForm, BookingStep, QuoteRequest};

/// Quotes and books trips against the injected repository
#[derive(Clone)]
pub struct BookingService {
    repo: Arc<dyn TripRepository>,
    pricing: Arc<PricingEngine>,
    events: broadcast::Sender<CatalogEvent>,
}

impl BookingService {
    pub fn new(repo: Arc<dyn TripRepository>, pricing: PricingEngine, events: broadcast::Sender<CatalogEvent>) -> Self {
        Self {
            repo,
            pricing: Arc::new(pricing),
            events,
        }
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    pub async fn quote(&self, req: &QuoteRequest) -> Result<PricingBreakdown, FunnelError> {
        let yacht = req.yacht_class.as_deref().filter(|c| !c.trim().is_empty());

        if let Some(trip_id) = req.trip_id {
            let trip = self
                .repo
                .find_by_id(trip_id)
                .await
                .ok_or(BookingError::NotFound(trip_id))?;
            return Ok(self.pricing.quote_trip(&trip, yacht, req.group_size)?);
        }

        let (destination, start, end) = match (req.destination, req.start_date, req.end_date) {
            (Some(destination), Some(start), Some(end)) => (destination, start, end),
            (destination, start, end) => {
                let mut errors = ValidationErrors::new();
                if destination.is_none() {
                    errors.add("destination", "Destination is required");
                }
                if start.is_none() {
                    errors.add("start_date", "Start date is required");
                }
                if end.is_none() {
                    errors.add("end_date", "End date is required");
                }
                return Err(errors.into());
            }
        };

        let nights = nights_between(start, end)?;
        let base = self.pricing.base_price_for(destination).unwrap_or_default();
        let mut request = PricingRequest::new(base, nights, req.group_size).for_destination(destination.display_name());
        if let Some(class) = yacht {
            request = request.with_yacht(class, self.pricing.yacht_multiplier(class)?);
        }

        debug!("Quoting {} for {} nights, group of {}", destination, nights, req.group_size);
        Ok(self.pricing.quote(&request)?)
    }

    /// Run the funnel on a complete form and book it.
    ///
    /// The funnel checks availability on a snapshot; the repository re-checks
    /// under the trip's lock, so a lost race still ends in
    /// `InsufficientAvailability`.
    pub async fn submit(&self, form: BookingForm) -> Result<BookingConfirmation, FunnelError> {
        // 1. Snapshot the trip
        let trip = self
            .repo
            .find_by_id(form.trip_id)
            .await
            .ok_or(BookingError::NotFound(form.trip_id))?;

        // 2. Walk every step up to review
        let mut funnel = BookingFunnel::from_form(&form, trip, &self.pricing)?;
        let pricing = funnel
            .pricing()
            .cloned()
            .ok_or(FunnelError::InvalidTransition { from: funnel.step(), to: BookingStep::Submitted })?;

        // 3. Book under the trip lock; `trip` is the state our decrement left
        let BookedTrip { booking, trip } = self
            .repo
            .book_trip(form.trip_id, funnel.party_size(), funnel.guest_info())
            .await?;
        funnel.submit()?;

        info!(
            "Booking {} confirmed: {} guests on {} ({} spots left)",
            booking.id, booking.party_size, trip.title, trip.available_spots
        );

        // 4. Fan out; nobody listening is fine
        let now = Utc::now().timestamp();
        let _ = self.events.send(CatalogEvent::BookingConfirmed(BookingConfirmedEvent {
            booking_id: booking.id,
            trip_id: trip.id,
            party_size: booking.party_size,
            total_minor: pricing.total,
            currency: trip.currency.clone(),
            timestamp: now,
        }));
        let _ = self.events.send(CatalogEvent::AvailabilityChanged(TripAvailabilityChangedEvent {
            trip_id: trip.id,
            available_spots: trip.available_spots,
            total_spots: trip.total_spots,
            changed_at: now,
        }));

        Ok(BookingConfirmation { booking, pricing, trip })
    }
}
