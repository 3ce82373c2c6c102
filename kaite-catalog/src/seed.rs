use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use uuid::Uuid;

use crate::trip::{Destination, Trip, TripError};

struct SeedRow {
    id: u128,
    destination: Destination,
    title: &'static str,
    start: (i32, u32, u32),
    end: (i32, u32, u32),
    spots: u32,
    booked: u32,
    price_minor: i64,
    discount: Option<u8>,
}

const SEASON: &[SeedRow] = &[
    SeedRow { id: 0x6b61_6974_0001, destination: Destination::Caribbean, title: "Grenadines Kite Safari", start: (2027, 1, 9), end: (2027, 1, 16), spots: 6, booked: 2, price_minor: 289_000, discount: None },
    SeedRow { id: 0x6b61_6974_0002, destination: Destination::Caribbean, title: "Grenadines Kite Safari", start: (2027, 2, 6), end: (2027, 2, 13), spots: 6, booked: 5, price_minor: 289_000, discount: Some(10) },
    SeedRow { id: 0x6b61_6974_0003, destination: Destination::Sardinia, title: "Sardinia South Coast Cruise", start: (2027, 5, 29), end: (2027, 6, 5), spots: 6, booked: 0, price_minor: 169_000, discount: Some(15) },
    SeedRow { id: 0x6b61_6974_0004, destination: Destination::Sardinia, title: "Sardinia Mistral Week", start: (2027, 7, 10), end: (2027, 7, 17), spots: 6, booked: 6, price_minor: 189_000, discount: None },
    SeedRow { id: 0x6b61_6974_0005, destination: Destination::Greece, title: "Cyclades Meltemi Cruise", start: (2027, 7, 24), end: (2027, 7, 31), spots: 6, booked: 1, price_minor: 209_000, discount: None },
    SeedRow { id: 0x6b61_6974_0006, destination: Destination::Greece, title: "Dodecanese Wave Week", start: (2027, 8, 21), end: (2027, 8, 28), spots: 6, booked: 3, price_minor: 219_000, discount: Some(20) },
    SeedRow { id: 0x6b61_6974_0007, destination: Destination::Brazil, title: "Ceará Downwinder", start: (2027, 9, 11), end: (2027, 9, 20), spots: 6, booked: 0, price_minor: 249_000, discount: None },
    SeedRow { id: 0x6b61_6974_0008, destination: Destination::Egypt, title: "Red Sea Liveaboard", start: (2027, 4, 3), end: (2027, 4, 10), spots: 6, booked: 4, price_minor: 149_000, discount: None },
];

/// Built-in trip schedule used when no trips file is configured
pub fn default_trips() -> Vec<Trip> {
    SEASON
        .iter()
        .filter_map(|row| {
            let start_date = NaiveDate::from_ymd_opt(row.start.0, row.start.1, row.start.2)?;
            let end_date = NaiveDate::from_ymd_opt(row.end.0, row.end.1, row.end.2)?;
            Some(Trip {
                id: Uuid::from_u128(row.id),
                destination: row.destination,
                title: row.title.to_string(),
                start_date,
                end_date,
                total_spots: row.spots,
                available_spots: row.spots.saturating_sub(row.booked),
                price_minor: row.price_minor,
                currency: "EUR".to_string(),
                discount_percentage: row.discount,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct TripFileEntry {
    id: Option<Uuid>,
    destination: Destination,
    title: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_spots: u32,
    available_spots: Option<u32>,
    price_minor: i64,
    #[serde(default = "default_currency")]
    currency: String,
    discount_percentage: Option<u8>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Parse a JSON array of trips and check every record's invariants.
///
/// Ids must be unique across the file.
pub fn trips_from_json(json: &str) -> Result<Vec<Trip>, TripError> {
    let entries: Vec<TripFileEntry> = serde_json::from_str(json).map_err(|e| TripError::Parse(e.to_string()))?;
    let mut seen = HashSet::with_capacity(entries.len());

    entries
        .into_iter()
        .map(|entry| {
            let trip = Trip {
                id: entry.id.unwrap_or_else(Uuid::new_v4),
                destination: entry.destination,
                title: entry.title,
                start_date: entry.start_date,
                end_date: entry.end_date,
                total_spots: entry.total_spots,
                available_spots: entry.available_spots.unwrap_or(entry.total_spots),
                price_minor: entry.price_minor,
                currency: entry.currency,
                discount_percentage: entry.discount_percentage,
            };
            trip.validate()?;
            if !seen.insert(trip.id) {
                return Err(TripError::DuplicateId(trip.id));
            }
            Ok(trip)
        })
        .collect()
}
