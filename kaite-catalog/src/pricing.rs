use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::trip::{Destination, Trip};

/// Berths on the operator's yachts
pub const VESSEL_BERTHS: u32 = 6;

/// One group-size discount tier ("6 or more guests get 15%")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupDiscountTier {
    pub min_group_size: u32,
    pub discount_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Berths on the yacht; larger groups are rejected
    pub max_group_size: u32,

    /// Group discount tiers, any order
    pub group_tiers: Vec<GroupDiscountTier>,

    /// Nightly charter price per destination slug (minor units)
    pub destination_base_prices: BTreeMap<String, i64>,

    /// Multipliers per yacht class (e.g., "premium" => 1.25)
    pub yacht_multipliers: BTreeMap<String, f64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            max_group_size: VESSEL_BERTHS,
            group_tiers: vec![
                GroupDiscountTier { min_group_size: 6, discount_percentage: 15.0 },
                GroupDiscountTier { min_group_size: 4, discount_percentage: 10.0 },
            ],
            destination_base_prices: {
                let mut m = BTreeMap::new();
                m.insert("caribbean".to_string(), 270_000);
                m.insert("sardinia".to_string(), 190_000);
                m.insert("greece".to_string(), 220_000);
                m.insert("brazil".to_string(), 240_000);
                m.insert("egypt".to_string(), 160_000);
                m
            },
            yacht_multipliers: {
                let mut m = BTreeMap::new();
                m.insert("standard".to_string(), 1.0);
                m.insert("premium".to_string(), 1.25);
                m.insert("luxury".to_string(), 1.6);
                m
            },
        }
    }
}

impl PricingConfig {
    /// Keep `max_group_size` within 1..=VESSEL_BERTHS
    pub fn cap_group_size(&mut self) {
        let capped = self.max_group_size.clamp(1, VESSEL_BERTHS);
        if capped != self.max_group_size {
            tracing::warn!(
                configured = self.max_group_size,
                capped,
                "pricing.max_group_size outside 1..={}, capped",
                VESSEL_BERTHS
            );
            self.max_group_size = capped;
        }
    }
}

/// Inputs to a quote. Amounts are minor units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequest {
    pub label: String,
    pub destination_base_price: i64,
    pub yacht_class: Option<String>,
    pub yacht_multiplier: f64,
    pub nights: u32,
    pub group_size: u32,
    pub trip_discount_percentage: Option<f64>,
}

impl PricingRequest {
    pub fn new(destination_base_price: i64, nights: u32, group_size: u32) -> Self {
        Self {
            label: "Yacht charter".to_string(),
            destination_base_price,
            yacht_class: None,
            yacht_multiplier: 1.0,
            nights,
            group_size,
            trip_discount_percentage: None,
        }
    }

    pub fn for_destination(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_yacht(mut self, class: impl Into<String>, multiplier: f64) -> Self {
        self.yacht_class = Some(class.into());
        self.yacht_multiplier = multiplier;
        self
    }

    pub fn with_trip_discount(mut self, percentage: f64) -> Self {
        self.trip_discount_percentage = Some(percentage);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub label: String,
    pub amount: i64,
}

/// Derived quote, never stored.
///
/// `per_person` and `per_night` come from the undiscounted nightly price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingBreakdown {
    pub base_price: i64,
    pub nights: u32,
    pub group_size: u32,
    pub subtotal: i64,
    pub trip_discount: i64,
    pub group_discount_percentage: f64,
    pub group_discount: i64,
    pub total: i64,
    pub per_person: i64,
    pub per_night: i64,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PricingError {
    #[error("Base price must be positive, got {0}")]
    InvalidBasePrice(i64),

    #[error("Yacht multiplier must be at least 1.0, got {0}")]
    InvalidMultiplier(f64),

    #[error("Trip must last at least one night")]
    InvalidNights,

    #[error("Group size must be between 1 and {max}, got {got}")]
    InvalidGroupSize { got: u32, max: u32 },

    #[error("Discount percentage must be 0-100, got {0}")]
    InvalidDiscount(f64),

    #[error("Unknown yacht class: {0}")]
    UnknownYachtClass(String),
}

/// Whole nights between two dates; the end date must be after the start.
pub fn nights_between(start: NaiveDate, end: NaiveDate) -> Result<u32, PricingError> {
    let days = (end - start).num_days();
    u32::try_from(days).ok().filter(|n| *n >= 1).ok_or(PricingError::InvalidNights)
}

/// Booking-funnel price calculator
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        let mut config = config;
        config.cap_group_size();
        config
            .group_tiers
            .sort_by(|a, b| b.min_group_size.cmp(&a.min_group_size));
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Group discount for a party, as a percentage. Highest matching tier wins.
    pub fn group_discount_percentage(&self, group_size: u32) -> f64 {
        self.config
            .group_tiers
            .iter()
            .find(|tier| group_size >= tier.min_group_size)
            .map(|tier| tier.discount_percentage)
            .unwrap_or(0.0)
    }

    pub fn yacht_multiplier(&self, class: &str) -> Result<f64, PricingError> {
        self.config
            .yacht_multipliers
            .get(&class.to_lowercase())
            .copied()
            .ok_or_else(|| PricingError::UnknownYachtClass(class.to_string()))
    }

    pub fn base_price_for(&self, destination: Destination) -> Option<i64> {
        self.config.destination_base_prices.get(destination.slug()).copied()
    }

    fn validate(&self, req: &PricingRequest) -> Result<(), PricingError> {
        if req.destination_base_price <= 0 {
            return Err(PricingError::InvalidBasePrice(req.destination_base_price));
        }
        if !req.yacht_multiplier.is_finite() || req.yacht_multiplier < 1.0 {
            return Err(PricingError::InvalidMultiplier(req.yacht_multiplier));
        }
        if req.nights < 1 {
            return Err(PricingError::InvalidNights);
        }
        if req.group_size < 1 || req.group_size > self.config.max_group_size {
            return Err(PricingError::InvalidGroupSize {
                got: req.group_size,
                max: self.config.max_group_size,
            });
        }
        if let Some(pct) = req.trip_discount_percentage {
            if !(0.0..=100.0).contains(&pct) {
                return Err(PricingError::InvalidDiscount(pct));
            }
        }
        Ok(())
    }

    /// Compute the full breakdown. Steps are applied in a fixed order:
    /// yacht multiplier, nights, trip discount, then the group tier.
    pub fn quote(&self, req: &PricingRequest) -> Result<PricingBreakdown, PricingError> {
        self.validate(req)?;

        let nights = f64::from(req.nights);
        let destination_price = req.destination_base_price as f64;

        // 1. Nightly price with the yacht upgrade
        let base_price = destination_price * req.yacht_multiplier;

        // 2. Subtotal across all nights
        let subtotal = base_price * nights;

        // 3. Trip-level discount
        let trip_pct = req.trip_discount_percentage.unwrap_or(0.0);
        let trip_discount = base_price * (trip_pct / 100.0) * nights;
        let after_trip_discount = subtotal - trip_discount;

        // 4-5. Group tier on what's left
        let group_pct = self.group_discount_percentage(req.group_size);
        let group_discount = after_trip_discount * (group_pct / 100.0);
        let total = after_trip_discount - group_discount;

        // 6. Pre-discount per-person and per-night figures
        let per_person = base_price / f64::from(req.group_size);
        let per_night = base_price / nights;

        let mut line_items = vec![LineItem {
            label: format!("{} · {} nights", req.label, req.nights),
            amount: round_minor(destination_price * nights),
        }];

        if req.yacht_multiplier > 1.0 {
            let class = req.yacht_class.as_deref().unwrap_or("upgrade");
            line_items.push(LineItem {
                label: format!("Yacht upgrade ({})", class),
                amount: round_minor((base_price - destination_price) * nights),
            });
        }

        if trip_discount > 0.0 {
            line_items.push(LineItem {
                label: format!("Trip discount ({}%)", trip_pct),
                amount: -round_minor(trip_discount),
            });
        }

        if group_discount > 0.0 {
            line_items.push(LineItem {
                label: format!("Group discount ({}%)", group_pct),
                amount: -round_minor(group_discount),
            });
        }

        Ok(PricingBreakdown {
            base_price: round_minor(base_price),
            nights: req.nights,
            group_size: req.group_size,
            subtotal: round_minor(subtotal),
            trip_discount: round_minor(trip_discount),
            group_discount_percentage: group_pct,
            group_discount: round_minor(group_discount),
            total: round_minor(total),
            per_person: round_minor(per_person),
            per_night: round_minor(per_night),
            line_items,
        })
    }

    /// Quote a catalog trip: destination base price, trip nights and trip discount
    /// come from the record. Falls back to the trip's own price when the
    /// destination has no configured base price.
    pub fn quote_trip(&self, trip: &Trip, yacht_class: Option<&str>, group_size: u32) -> Result<PricingBreakdown, PricingError> {
        let base = self.base_price_for(trip.destination).unwrap_or(trip.price_minor);
        let nights = nights_between(trip.start_date, trip.end_date)?;

        let mut req = PricingRequest::new(base, nights, group_size).for_destination(trip.destination.display_name());

        if let Some(class) = yacht_class {
            let multiplier = self.yacht_multiplier(class)?;
            req = req.with_yacht(class, multiplier);
        }

        if let Some(pct) = trip.discount_percentage.filter(|p| *p > 0) {
            req = req.with_trip_discount(f64::from(pct));
        }

        self.quote(&req)
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

fn round_minor(amount: f64) -> i64 {
    amount.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_group_gets_fifteen_percent() {
        let engine = PricingEngine::default();
        let quote = engine.quote(&PricingRequest::new(2700, 7, 6)).unwrap();

        assert_eq!(quote.group_discount_percentage, 15.0);
        assert_eq!(quote.subtotal, 18900);
        assert_eq!(quote.total, 16065);
        assert_eq!(quote.per_person, 450);
        assert_eq!(quote.per_night, 386);
        assert_eq!(quote.line_items.len(), 2);
        assert_eq!(quote.line_items[1].amount, -2835);
    }

    #[test]
    fn test_group_tier_boundaries() {
        let engine = PricingEngine::default();
        assert_eq!(engine.group_discount_percentage(1), 0.0);
        assert_eq!(engine.group_discount_percentage(3), 0.0);
        assert_eq!(engine.group_discount_percentage(4), 10.0);
        assert_eq!(engine.group_discount_percentage(5), 10.0);
        assert_eq!(engine.group_discount_percentage(6), 15.0);

        let quote = engine.quote(&PricingRequest::new(1000, 1, 4)).unwrap();
        assert_eq!(quote.total, 900);
        let quote = engine.quote(&PricingRequest::new(1000, 1, 3)).unwrap();
        assert_eq!(quote.total, 1000);
    }

    #[test]
    fn test_trip_discount_applies_before_group_discount() {
        let engine = PricingEngine::default();
        let req = PricingRequest::new(200_000, 7, 4)
            .for_destination("Greece")
            .with_yacht("premium", 1.25)
            .with_trip_discount(20.0);
        let quote = engine.quote(&req).unwrap();

        // 2500.00/night * 7 = 17500.00; -20% = 14000.00; -10% = 12600.00
        assert_eq!(quote.base_price, 250_000);
        assert_eq!(quote.subtotal, 1_750_000);
        assert_eq!(quote.trip_discount, 350_000);
        assert_eq!(quote.total, 1_260_000);

        let labels: Vec<&str> = quote.line_items.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec![
            "Greece · 7 nights",
            "Yacht upgrade (premium)",
            "Trip discount (20%)",
            "Group discount (10%)",
        ]);
        assert_eq!(quote.line_items[1].amount, 350_000);

        // per-person is pre-discount
        assert_eq!(quote.per_person, 62_500);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let engine = PricingEngine::default();
        assert_eq!(
            engine.quote(&PricingRequest::new(2700, 7, 7)).unwrap_err(),
            PricingError::InvalidGroupSize { got: 7, max: 6 }
        );
        assert!(matches!(engine.quote(&PricingRequest::new(2700, 7, 0)), Err(PricingError::InvalidGroupSize { .. })));
        assert_eq!(engine.quote(&PricingRequest::new(2700, 0, 2)).unwrap_err(), PricingError::InvalidNights);
        assert_eq!(engine.quote(&PricingRequest::new(0, 7, 2)).unwrap_err(), PricingError::InvalidBasePrice(0));
        assert!(matches!(
            engine.quote(&PricingRequest::new(2700, 7, 2).with_yacht("budget", 0.9)),
            Err(PricingError::InvalidMultiplier(_))
        ));
        assert!(matches!(
            engine.quote(&PricingRequest::new(2700, 7, 2).with_trip_discount(120.0)),
            Err(PricingError::InvalidDiscount(_))
        ));
        assert!(engine.yacht_multiplier("submarine").is_err());
    }

    #[test]
    fn test_group_size_is_capped_at_vessel_berths() {
        let engine = PricingEngine::new(PricingConfig { max_group_size: 8, ..PricingConfig::default() });
        assert_eq!(engine.config().max_group_size, VESSEL_BERTHS);
        assert!(engine.quote(&PricingRequest::new(220_000, 7, 7)).is_err());
        assert!(engine.quote(&PricingRequest::new(220_000, 7, 6)).is_ok());

        let mut config = PricingConfig { max_group_size: 0, ..PricingConfig::default() };
        config.cap_group_size();
        assert_eq!(config.max_group_size, 1);
    }

    #[test]
    fn test_night_counting() {
        let start = NaiveDate::from_ymd_opt(2027, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2027, 3, 8).unwrap();
        assert_eq!(nights_between(start, end).unwrap(), 7);
        assert!(nights_between(end, start).is_err());
        assert!(nights_between(start, start).is_err());
    }

    #[test]
    fn test_quote_trip_reads_catalog_record() {
        let engine = PricingEngine::default();
        let trip = Trip::new(
            Destination::Caribbean,
            "Grenadines Kite Safari",
            NaiveDate::from_ymd_opt(2027, 2, 6).unwrap(),
            NaiveDate::from_ymd_opt(2027, 2, 13).unwrap(),
            6,
            249_000,
            "EUR",
        )
        .unwrap();

        let quote = engine.quote_trip(&trip, None, 6).unwrap();
        assert_eq!(quote.total, 1_606_500);
        assert_eq!(quote.line_items[0].label, "Caribbean · 7 nights");

        let luxury = engine.quote_trip(&trip, Some("Luxury"), 2).unwrap();
        assert_eq!(luxury.base_price, 432_000);
    }
}
