use kaite_catalog::{Destination, KiteSpot, SkillLevel, Trip};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{SpotRecommendation, TripRecommendation};
use crate::profile::{BudgetTier, UserProfile};

/// Neutral score when a profile says nothing the spot can be compared on
const NEUTRAL_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingWeights {
    pub skill_weight: f64,
    pub water_weight: f64,
    pub wind_weight: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            skill_weight: 0.4,
            water_weight: 0.3,
            wind_weight: 0.3,
        }
    }
}

/// Scores kitespots and trips against a rider profile
#[derive(Debug, Clone, Default)]
pub struct SpotRanker {
    weights: RankingWeights,
}

impl SpotRanker {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    /// Weighted mean of skill fit, water overlap and wind coverage, in [0, 1].
    /// Components the profile leaves empty are left out of the mean.
    pub fn match_score(&self, profile: &UserProfile, spot: &KiteSpot) -> f64 {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;

        if let Some(level) = profile.effective_skill() {
            weighted += self.weights.skill_weight * skill_fit(level, spot);
            total_weight += self.weights.skill_weight;
        }

        if !profile.preferred_water.is_empty() {
            let matched = profile.preferred_water.iter().filter(|w| spot.has_water(**w)).count();
            let overlap = matched as f64 / profile.preferred_water.len() as f64;
            weighted += self.weights.water_weight * overlap;
            total_weight += self.weights.water_weight;
        }

        if let Some(wind) = profile.wind_range {
            weighted += self.weights.wind_weight * wind.coverage_by(&spot.wind);
            total_weight += self.weights.wind_weight;
        }

        if total_weight <= 0.0 {
            return NEUTRAL_SCORE;
        }

        (weighted / total_weight).clamp(0.0, 1.0)
    }

    /// Rank spots best-first. Equal scores keep catalog order.
    pub fn rank_spots<'a, I>(&self, profile: &UserProfile, spots: I, limit: usize) -> Vec<SpotRecommendation>
    where
        I: IntoIterator<Item = &'a KiteSpot>,
    {
        let mut scored: Vec<SpotRecommendation> = spots
            .into_iter()
            .map(|spot| SpotRecommendation {
                spot_id: spot.id.clone(),
                name: spot.name.clone(),
                country: spot.country.clone(),
                match_score: round_score(self.match_score(profile, spot)),
                description: spot.description.clone(),
                reasons: reasons(profile, spot),
            })
            .collect();

        scored.sort_by(|a, b| b.match_score.partial_cmp(&a.match_score).unwrap_or(Ordering::Equal));
        scored.truncate(limit);
        scored
    }

    /// Bookable trips, preferred destinations first (in the given order), then
    /// by start date, or by price for budget riders.
    pub fn rank_trips(
        &self,
        trips: &[Trip],
        preferred: &[Destination],
        budget: Option<BudgetTier>,
        limit: usize,
    ) -> Vec<TripRecommendation> {
        let mut bookable: Vec<&Trip> = trips.iter().filter(|t| t.is_bookable()).collect();

        let preference = |trip: &Trip| {
            preferred
                .iter()
                .position(|d| *d == trip.destination)
                .unwrap_or(preferred.len())
        };

        if budget == Some(BudgetTier::Budget) {
            bookable.sort_by_key(|t| (preference(t), t.discounted_price(), t.start_date));
        } else {
            bookable.sort_by_key(|t| (preference(t), t.start_date));
        }

        bookable.into_iter().take(limit).map(TripRecommendation::from).collect()
    }
}

fn skill_fit(level: SkillLevel, spot: &KiteSpot) -> f64 {
    if spot.suits(level) {
        1.0
    } else if spot.skill_levels.iter().any(|l| *l < level) {
        // experienced riders can still enjoy an easier spot
        0.5
    } else {
        0.0
    }
}

fn reasons(profile: &UserProfile, spot: &KiteSpot) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(level) = profile.effective_skill() {
        if spot.suits(level) {
            out.push(format!("Good for {} riders", skill_label(level)));
        }
    }

    for water in profile.preferred_water.iter().filter(|w| spot.has_water(**w)) {
        out.push(format!("{} water", water_label(*water)));
    }

    out.push(format!("{}-{} kn typical wind", spot.wind.min_knots, spot.wind.max_knots));
    out
}

pub(crate) fn skill_label(level: SkillLevel) -> &'static str {
    match level {
        SkillLevel::Beginner => "beginner",
        SkillLevel::Intermediate => "intermediate",
        SkillLevel::Advanced => "advanced",
    }
}

fn water_label(water: kaite_catalog::WaterType) -> &'static str {
    match water {
        kaite_catalog::WaterType::Flat => "Flat",
        kaite_catalog::WaterType::Chop => "Choppy",
        kaite_catalog::WaterType::Waves => "Wave",
    }
}

fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
