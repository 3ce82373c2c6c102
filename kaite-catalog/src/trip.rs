use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::ledger::BookingError;

/// Trips with this many spots left (or fewer) are flagged as `Low`.
pub const DEFAULT_LOW_AVAILABILITY: u32 = 2;

/// Upper bound for a per-person price in minor units (10 million).
pub const MAX_PRICE_MINOR: i64 = 1_000_000_000;

/// Destinations the operator runs yacht trips to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Caribbean,
    Sardinia,
    Greece,
    Brazil,
    Egypt,
}

impl Destination {
    pub const ALL: [Destination; 5] = [
        Destination::Caribbean,
        Destination::Sardinia,
        Destination::Greece,
        Destination::Brazil,
        Destination::Egypt,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Destination::Caribbean => "caribbean",
            Destination::Sardinia => "sardinia",
            Destination::Greece => "greece",
            Destination::Brazil => "brazil",
            Destination::Egypt => "egypt",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Destination::Caribbean => "Caribbean",
            Destination::Sardinia => "Sardinia",
            Destination::Greece => "Greece",
            Destination::Brazil => "Brazil",
            Destination::Egypt => "Egypt",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Destination {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Destination::ALL
            .into_iter()
            .find(|d| d.slug() == needle)
            .ok_or(TripError::UnknownDestination(s.to_string()))
    }
}

/// Availability badge shown on trip cards
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Available,
    Low,
    SoldOut,
}

/// A scheduled yacht trip with bookable spots.
///
/// Prices are in minor currency units (cents).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    pub id: Uuid,
    pub destination: Destination,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_spots: u32,
    pub available_spots: u32,
    pub price_minor: i64,
    pub currency: String,
    pub discount_percentage: Option<u8>,
}

impl Trip {
    pub fn new(
        destination: Destination,
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_spots: u32,
        price_minor: i64,
        currency: impl Into<String>,
    ) -> Result<Self, TripError> {
        if end_date <= start_date {
            return Err(TripError::InvalidDateRange { start: start_date, end: end_date });
        }
        check_price(price_minor)?;

        Ok(Self {
            id: Uuid::new_v4(),
            destination,
            title: title.into(),
            start_date,
            end_date,
            total_spots,
            available_spots: total_spots,
            price_minor,
            currency: currency.into(),
            discount_percentage: None,
        })
    }

    pub fn with_discount(mut self, percentage: u8) -> Result<Self, TripError> {
        if percentage > 100 {
            return Err(TripError::InvalidDiscount(percentage));
        }
        self.discount_percentage = Some(percentage);
        Ok(self)
    }

    /// Check the record invariants (used for trips loaded from files)
    pub fn validate(&self) -> Result<(), TripError> {
        if self.end_date <= self.start_date {
            return Err(TripError::InvalidDateRange { start: self.start_date, end: self.end_date });
        }
        if self.available_spots > self.total_spots {
            return Err(TripError::AvailabilityExceedsCapacity {
                available: self.available_spots,
                total: self.total_spots,
            });
        }
        check_price(self.price_minor)?;
        if let Some(pct) = self.discount_percentage {
            if pct > 100 {
                return Err(TripError::InvalidDiscount(pct));
            }
        }
        Ok(())
    }

    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn status(&self) -> TripStatus {
        self.status_with_threshold(DEFAULT_LOW_AVAILABILITY)
    }

    pub fn status_with_threshold(&self, low_threshold: u32) -> TripStatus {
        if self.available_spots == 0 {
            TripStatus::SoldOut
        } else if self.available_spots <= low_threshold {
            TripStatus::Low
        } else {
            TripStatus::Available
        }
    }

    pub fn is_bookable(&self) -> bool {
        self.available_spots > 0
    }

    pub fn has_discount(&self) -> bool {
        self.discount_percentage.unwrap_or(0) > 0
    }

    /// Price after the trip discount, rounded half away from zero to the minor unit
    pub fn discounted_price(&self) -> i64 {
        let pct = i128::from(self.discount_percentage.unwrap_or(0).min(100));
        if pct == 0 {
            return self.price_minor;
        }

        // i128 so unvalidated prices cannot overflow
        let scaled = i128::from(self.price_minor) * (100 - pct);
        let rounded = if scaled >= 0 { (scaled + 50) / 100 } else { (scaled - 50) / 100 };
        i64::try_from(rounded).unwrap_or(self.price_minor)
    }

    pub fn savings(&self) -> i64 {
        self.price_minor - self.discounted_price()
    }

    /// Take `party_size` spots off the trip. Nothing changes on error.
    pub fn reserve(&mut self, party_size: u32) -> Result<(), BookingError> {
        if party_size == 0 {
            return Err(BookingError::InvalidPartySize(party_size));
        }

        if party_size > self.available_spots {
            return Err(BookingError::InsufficientAvailability {
                requested: party_size,
                available: self.available_spots,
            });
        }

        self.available_spots -= party_size;
        Ok(())
    }
}

fn check_price(price_minor: i64) -> Result<(), TripError> {
    if price_minor <= 0 || price_minor > MAX_PRICE_MINOR {
        return Err(TripError::InvalidPrice(price_minor));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TripError {
    #[error("Trip must end after it starts ({start} .. {end})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Available spots {available} exceed capacity {total}")]
    AvailabilityExceedsCapacity { available: u32, total: u32 },

    #[error("Discount percentage must be 0-100, got {0}")]
    InvalidDiscount(u8),

    #[error("Price must be between 1 and {MAX_PRICE_MINOR} minor units, got {0}")]
    InvalidPrice(i64),

    #[error("Duplicate trip id: {0}")]
    DuplicateId(Uuid),

    #[error("Unknown destination: {0}")]
    UnknownDestination(String),

    #[error("Invalid trip data: {0}")]
    Parse(String),
}
