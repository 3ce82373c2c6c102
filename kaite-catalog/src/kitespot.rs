use serde::{Deserialize, Serialize};

use crate::trip::Destination;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WaterType {
    Flat,
    Chop,
    Waves,
}

/// Typical wind window in knots, inclusive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindRange {
    pub min_knots: u32,
    pub max_knots: u32,
}

impl WindRange {
    pub const fn new(min_knots: u32, max_knots: u32) -> Self {
        Self { min_knots, max_knots }
    }

    pub fn width(&self) -> u32 {
        self.max_knots.saturating_sub(self.min_knots)
    }

    /// Share of `self` covered by `other`, in [0, 1].
    /// A zero-width range counts as fully covered when the point lies inside `other`.
    pub fn coverage_by(&self, other: &WindRange) -> f64 {
        let lo = self.min_knots.max(other.min_knots);
        let hi = self.max_knots.min(other.max_knots);
        if hi < lo {
            return 0.0;
        }
        if self.width() == 0 {
            return 1.0;
        }
        f64::from(hi - lo) / f64::from(self.width())
    }

    pub fn contains(&self, knots: u32) -> bool {
        (self.min_knots..=self.max_knots).contains(&knots)
    }
}

/// Static reference data about a kitesurf spot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KiteSpot {
    pub id: String,
    pub name: String,
    pub country: String,
    pub airport_code: String,
    pub destination: Option<Destination>,
    pub wind: WindRange,
    pub water_types: Vec<WaterType>,
    pub skill_levels: Vec<SkillLevel>,
    pub best_months: Vec<u32>,
    pub description: String,
}

impl KiteSpot {
    pub fn suits(&self, level: SkillLevel) -> bool {
        self.skill_levels.contains(&level)
    }

    pub fn has_water(&self, water: WaterType) -> bool {
        self.water_types.contains(&water)
    }
}

fn spot(
    id: &str,
    name: &str,
    country: &str,
    airport_code: &str,
    destination: Option<Destination>,
    wind: WindRange,
    water_types: &[WaterType],
    skill_levels: &[SkillLevel],
    best_months: &[u32],
    description: &str,
) -> KiteSpot {
    KiteSpot {
        id: id.to_string(),
        name: name.to_string(),
        country: country.to_string(),
        airport_code: airport_code.to_string(),
        destination,
        wind,
        water_types: water_types.to_vec(),
        skill_levels: skill_levels.to_vec(),
        best_months: best_months.to_vec(),
        description: description.to_string(),
    }
}

/// The spot catalog the chat agent recommends from, in display order
pub fn default_kitespots() -> Vec<KiteSpot> {
    use SkillLevel::*;
    use WaterType::*;

    vec![
        spot(
            "punta-trettu",
            "Punta Trettu",
            "Italy",
            "CAG",
            Some(Destination::Sardinia),
            WindRange::new(12, 22),
            &[Flat],
            &[Beginner, Intermediate],
            &[5, 6, 7, 8, 9],
            "Waist-deep flat lagoon in south-west Sardinia, the classic place to take your first rides.",
        ),
        spot(
            "porto-pollo",
            "Porto Pollo",
            "Italy",
            "OLB",
            Some(Destination::Sardinia),
            WindRange::new(15, 30),
            &[Flat, Chop],
            &[Intermediate, Advanced],
            &[6, 7, 8, 9],
            "Mistral-fed bay facing Corsica with a flat inside and choppy freestyle water further out.",
        ),
        spot(
            "union-island",
            "Union Island",
            "St. Vincent & the Grenadines",
            "UNI",
            Some(Destination::Caribbean),
            WindRange::new(15, 25),
            &[Flat, Chop],
            &[Beginner, Intermediate, Advanced],
            &[12, 1, 2, 3, 4, 5],
            "Trade-wind reef lagoon at Clifton, reachable only by boat and perfect for a yacht trip.",
        ),
        spot(
            "los-roques",
            "Los Roques",
            "Venezuela",
            "LRV",
            Some(Destination::Caribbean),
            WindRange::new(14, 24),
            &[Flat],
            &[Beginner, Intermediate],
            &[1, 2, 3, 4, 5, 6],
            "Archipelago of sandbanks with turquoise flat water and steady trades.",
        ),
        spot(
            "prasonisi",
            "Prasonisi",
            "Greece",
            "RHO",
            Some(Destination::Greece),
            WindRange::new(18, 35),
            &[Flat, Waves],
            &[Intermediate, Advanced],
            &[6, 7, 8, 9],
            "Sand spit on Rhodes with flat water on one side and Aegean waves on the other.",
        ),
        spot(
            "paros-pounda",
            "Pounda",
            "Greece",
            "PAS",
            Some(Destination::Greece),
            WindRange::new(16, 30),
            &[Chop],
            &[Beginner, Intermediate, Advanced],
            &[6, 7, 8, 9],
            "Meltemi channel between Paros and Antiparos with shallow sandy sections.",
        ),
        spot(
            "cumbuco",
            "Cumbuco",
            "Brazil",
            "FOR",
            Some(Destination::Brazil),
            WindRange::new(18, 28),
            &[Flat, Chop, Waves],
            &[Beginner, Intermediate, Advanced],
            &[7, 8, 9, 10, 11, 12],
            "Reliable north-east Brazil wind with lagoons for learning and ocean waves for the rest.",
        ),
        spot(
            "jericoacoara",
            "Jericoacoara",
            "Brazil",
            "JJD",
            Some(Destination::Brazil),
            WindRange::new(20, 30),
            &[Waves, Chop],
            &[Advanced],
            &[8, 9, 10, 11, 12],
            "Downwinder heaven with point-break waves in front of the dunes.",
        ),
        spot(
            "el-gouna",
            "El Gouna",
            "Egypt",
            "HRG",
            Some(Destination::Egypt),
            WindRange::new(14, 25),
            &[Flat],
            &[Beginner, Intermediate],
            &[3, 4, 5, 6, 7, 8, 9, 10],
            "Red Sea flat water with warm temperatures most of the year.",
        ),
        spot(
            "tarifa",
            "Tarifa",
            "Spain",
            "AGP",
            None,
            WindRange::new(15, 40),
            &[Chop, Waves],
            &[Intermediate, Advanced],
            &[5, 6, 7, 8, 9],
            "Europe's wind capital, where Levante and Poniente meet at the strait of Gibraltar.",
        ),
        spot(
            "dakhla",
            "Dakhla",
            "Morocco",
            "VIL",
            None,
            WindRange::new(16, 28),
            &[Flat, Waves],
            &[Beginner, Intermediate, Advanced],
            &[3, 4, 5, 6, 7, 8, 9, 10],
            "Desert lagoon with glassy flat water plus open-ocean waves at Speed Spot and beyond.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_coverage() {
        let rider = WindRange::new(12, 20);
        assert_eq!(rider.coverage_by(&WindRange::new(12, 20)), 1.0);
        assert_eq!(rider.coverage_by(&WindRange::new(16, 30)), 0.5);
        assert_eq!(rider.coverage_by(&WindRange::new(25, 35)), 0.0);
        assert_eq!(WindRange::new(18, 18).coverage_by(&WindRange::new(15, 25)), 1.0);
        assert!(WindRange::new(15, 25).contains(25));
    }

    #[test]
    fn test_catalog_is_consistent() {
        let spots = default_kitespots();
        assert!(spots.iter().any(|s| s.suits(SkillLevel::Beginner)));

        let mut ids: Vec<&str> = spots.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), spots.len());

        for spot in &spots {
            assert!(spot.wind.min_knots <= spot.wind.max_knots);
            assert!(!spot.water_types.is_empty());
            assert!(!spot.skill_levels.is_empty());
            assert!(spot.best_months.iter().all(|m| (1..=12).contains(m)));
        }
    }
}
