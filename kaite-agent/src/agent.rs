use kaite_catalog::kitespot::default_kitespots;
use kaite_catalog::{KiteSpot, Trip};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::intents::{default_rules, Intent, IntentRule, QueryContext};
use crate::models::{CallToAction, ChatMessage, CtaAction, MessageMetadata};
use crate::profile::UserProfile;
use crate::ranker::{RankingWeights, SpotRanker};
use crate::replies;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("No kitespots match intent {0:?}")]
    NoCandidates(Intent),
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_query_chars: usize,
    pub max_recommendations: usize,
    pub max_trip_recommendations: usize,
    pub weights: RankingWeights,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_query_chars: 500,
            max_recommendations: 3,
            max_trip_recommendations: 3,
            weights: RankingWeights::default(),
        }
    }
}

/// Inputs for a single turn besides the text itself
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub profile: Option<&'a UserProfile>,
    pub trips: &'a [Trip],
}

impl Request<'_> {
    /// The rider's profile with gaps filled from `defaults`
    fn profile_or(&self, defaults: UserProfile) -> UserProfile {
        match self.profile {
            Some(p) => p.merged_with(&defaults),
            None => defaults,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub content: String,
    pub metadata: MessageMetadata,
}

/// Rule-based chat agent. Holds no per-conversation state.
pub struct KaiteAgent {
    spots: Vec<KiteSpot>,
    config: AgentConfig,
    ranker: SpotRanker,
    rules: Vec<IntentRule>,
}

impl KaiteAgent {
    pub fn new(spots: Vec<KiteSpot>, config: AgentConfig) -> Self {
        let ranker = SpotRanker::new(config.weights.clone());
        Self {
            spots,
            config,
            ranker,
            rules: default_rules(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_kitespots(), AgentConfig::default())
    }

    pub fn spots(&self) -> &[KiteSpot] {
        &self.spots
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The message as the agent reads it
    pub fn clip_query(&self, text: &str) -> String {
        QueryContext::clip(text, self.config.max_query_chars)
    }

    /// Intent of the first matching rule, `None` when nothing matches
    pub fn classify(&self, text: &str) -> Option<Intent> {
        let query = QueryContext::parse(text, self.config.max_query_chars);
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(self, &query))
            .map(|rule| rule.intent)
    }

    /// Answer one user message. Never fails: handler errors turn into an
    /// apology with a contact button.
    pub fn process_query(&self, text: &str, profile: Option<&UserProfile>, trips: &[Trip]) -> ChatMessage {
        let query = QueryContext::parse(text, self.config.max_query_chars);
        let request = Request { profile, trips };

        let (intent, result) = match self.rules.iter().find(|rule| (rule.predicate)(self, &query)) {
            Some(rule) => (rule.intent, (rule.handler)(self, &query, &request)),
            None => (Intent::General, Ok(replies::general())),
        };

        debug!("Chat query classified as {:?} ({} tokens)", intent, query.tokens.len());

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Agent failed to answer {:?} query: {}", intent, e);
                replies::apology()
            }
        };

        let mut metadata = reply.metadata;
        metadata.intent = Some(intent);
        ChatMessage::assistant(reply.content, metadata)
    }

    fn check_profile(profile: &UserProfile) -> Result<(), AgentError> {
        if let Some(wind) = profile.wind_range {
            if wind.min_knots > wind.max_knots {
                return Err(AgentError::InvalidProfile(format!(
                    "wind range {}-{} kn is inverted",
                    wind.min_knots, wind.max_knots
                )));
            }
        }
        Ok(())
    }

    /// Rank `candidates` and attach bookable trips for the top spots' destinations
    fn recommend<'a, I>(
        &self,
        intent: Intent,
        profile: &UserProfile,
        candidates: I,
        request: &Request<'_>,
    ) -> Result<MessageMetadata, AgentError>
    where
        I: IntoIterator<Item = &'a KiteSpot>,
    {
        Self::check_profile(profile)?;

        let recommendations = self
            .ranker
            .rank_spots(profile, candidates, self.config.max_recommendations);
        if recommendations.is_empty() {
            return Err(AgentError::NoCandidates(intent));
        }

        let mut destinations = Vec::new();
        for rec in &recommendations {
            let destination = self
                .spots
                .iter()
                .find(|s| s.id == rec.spot_id)
                .and_then(|s| s.destination);
            if let Some(d) = destination {
                if !destinations.contains(&d) {
                    destinations.push(d);
                }
            }
        }

        let booking_recommendations = self.ranker.rank_trips(
            request.trips,
            &destinations,
            profile.budget,
            self.config.max_trip_recommendations,
        );

        let top = &recommendations[0];
        let mut buttons = vec![CallToAction::new(format!("View {}", top.name), CtaAction::ViewSpot).targeting(top.spot_id.clone())];
        if let Some(trip) = booking_recommendations.first() {
            buttons.push(CallToAction::new(format!("Book {}", trip.title), CtaAction::BookTrip).targeting(trip.trip_id.to_string()));
        }
        buttons.push(replies::browse_button());

        Ok(MessageMetadata {
            intent: Some(intent),
            recommendations,
            booking_recommendations,
            quick_replies: Vec::new(),
            buttons,
        })
    }
}

pub(crate) mod handlers {
    use kaite_catalog::{SkillLevel, WaterType, WindRange};

    use super::{AgentError, KaiteAgent, Reply, Request};
    use crate::intents::{Intent, QueryContext};
    use crate::models::{CallToAction, CtaAction, MessageMetadata, QuickReply};
    use crate::profile::UserProfile;
    use crate::replies;

    fn chips(labels: &[&str]) -> Vec<QuickReply> {
        labels.iter().map(|l| QuickReply::new(l)).collect()
    }

    pub fn beginner(agent: &KaiteAgent, _query: &QueryContext, request: &Request<'_>) -> Result<Reply, AgentError> {
        let mut profile = request.profile_or(UserProfile::beginner());
        profile.skill_level = Some(SkillLevel::Beginner);

        let candidates = agent.spots.iter().filter(|s| s.suits(SkillLevel::Beginner));
        let mut metadata = agent.recommend(Intent::Beginner, &profile, candidates, request)?;
        metadata.quick_replies = chips(&["What wind do I need?", "Available trips", "Wave spots"]);

        Ok(Reply {
            content: format!(
                "{} Top picks: {}.",
                replies::BEGINNER_INTRO,
                replies::spot_list(&metadata.recommendations)
            ),
            metadata,
        })
    }

    pub fn wind(agent: &KaiteAgent, query: &QueryContext, request: &Request<'_>) -> Result<Reply, AgentError> {
        let knots = query.wind_speed();
        let defaults = UserProfile {
            wind_range: Some(match knots {
                Some(k) => WindRange::new(k.saturating_sub(4), k + 4),
                None => WindRange::new(15, 25),
            }),
            ..UserProfile::default()
        };
        let mut profile = request.profile_or(defaults.clone());
        // a number in the message beats the stored range
        if knots.is_some() {
            profile.wind_range = defaults.wind_range;
        }

        let candidates: Vec<_> = agent
            .spots
            .iter()
            .filter(|s| knots.map_or(true, |k| s.wind.contains(k)))
            .collect();
        if let (Some(k), true) = (knots, candidates.is_empty()) {
            return Ok(replies::no_spot_for(k));
        }
        let mut metadata = agent.recommend(Intent::Wind, &profile, candidates, request)?;
        metadata.quick_replies = chips(&["Beginner spots", "Wave spots", "Available trips"]);

        let intro = match knots {
            Some(k) => replies::wind_for(k),
            None => replies::WIND_INTRO.to_string(),
        };
        Ok(Reply {
            content: format!("{} Spots that match: {}.", intro, replies::spot_list(&metadata.recommendations)),
            metadata,
        })
    }

    pub fn waves(agent: &KaiteAgent, _query: &QueryContext, request: &Request<'_>) -> Result<Reply, AgentError> {
        let mut profile = request.profile_or(UserProfile::wave_rider());
        profile.preferred_water = vec![WaterType::Waves];

        let candidates = agent.spots.iter().filter(|s| s.has_water(WaterType::Waves));
        let mut metadata = agent.recommend(Intent::Waves, &profile, candidates, request)?;
        metadata.quick_replies = chips(&["Flat water spots", "Wind conditions", "Available trips"]);

        Ok(Reply {
            content: format!("{} {}.", replies::WAVES_INTRO, replies::spot_list(&metadata.recommendations)),
            metadata,
        })
    }

    pub fn booking(agent: &KaiteAgent, query: &QueryContext, request: &Request<'_>) -> Result<Reply, AgentError> {
        let budget = request.profile.and_then(|p| p.budget);
        let trips = agent.ranker.rank_trips(
            request.trips,
            &query.destinations(),
            budget,
            agent.config.max_trip_recommendations,
        );

        if trips.is_empty() {
            return Ok(Reply {
                content: replies::BOOKING_SOLD_OUT.to_string(),
                metadata: MessageMetadata {
                    buttons: vec![replies::contact_button()],
                    ..MessageMetadata::default()
                },
            });
        }

        let summary = trips
            .iter()
            .map(|t| format!("{} ({}, {} spots left)", t.title, t.start_date, t.available_spots))
            .collect::<Vec<_>>()
            .join("; ");

        let mut buttons: Vec<CallToAction> = trips
            .iter()
            .map(|t| CallToAction::new(format!("Book {}", t.title), CtaAction::BookTrip).targeting(t.trip_id.to_string()))
            .collect();
        buttons.push(replies::browse_button());

        Ok(Reply {
            content: format!("{} {}.", replies::BOOKING_INTRO, summary),
            metadata: MessageMetadata {
                intent: Some(Intent::Booking),
                booking_recommendations: trips,
                quick_replies: chips(&["Beginner spots", "Wave spots"]),
                buttons,
                ..MessageMetadata::default()
            },
        })
    }

    pub fn destination(agent: &KaiteAgent, query: &QueryContext, request: &Request<'_>) -> Result<Reply, AgentError> {
        let named = query.spots(&agent.spots);
        let destinations = query.destinations();

        let profile = request.profile_or(UserProfile::default());
        let candidates: Vec<_> = if named.is_empty() {
            agent
                .spots
                .iter()
                .filter(|s| s.destination.is_some_and(|d| destinations.contains(&d)))
                .collect()
        } else {
            named
        };

        let mut metadata = agent.recommend(Intent::Destination, &profile, candidates, request)?;
        metadata.quick_replies = chips(&["Available trips", "Beginner spots", "Wind conditions"]);

        Ok(Reply {
            content: format!(
                "{} {}.",
                replies::DESTINATION_INTRO,
                replies::spot_list(&metadata.recommendations)
            ),
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kaite_catalog::{Destination, SkillLevel, WindRange};

    fn trips() -> Vec<Trip> {
        let date = |m, d| NaiveDate::from_ymd_opt(2027, m, d).unwrap();
        vec![
            Trip::new(Destination::Greece, "Cyclades Meltemi", date(7, 3), date(7, 10), 6, 220_000, "EUR").unwrap(),
            Trip::new(Destination::Sardinia, "Sardinia Lagoon", date(6, 5), date(6, 12), 6, 190_000, "EUR").unwrap(),
        ]
    }

    #[test]
    fn test_beginner_query_returns_spots() {
        let agent = KaiteAgent::with_defaults();
        let msg = agent.process_query("Show me beginner spots", None, &trips());

        assert_eq!(msg.intent(), Some(Intent::Beginner));
        let recs = msg.recommendations();
        assert!(!recs.is_empty());
        assert!(recs.len() <= 3);
        assert_eq!(recs[0].spot_id, "punta-trettu");
        let spots = default_kitespots();
        for rec in recs {
            let spot = spots.iter().find(|s| s.id == rec.spot_id).unwrap();
            assert!(spot.suits(SkillLevel::Beginner));
        }
        // Punta Trettu is in Sardinia
        assert_eq!(msg.booking_recommendations()[0].destination, Destination::Sardinia);
    }

    #[test]
    fn test_degenerate_input_never_panics() {
        let agent = KaiteAgent::with_defaults();
        let long = "kite ".repeat(5_000);
        for text in ["", "   ", "🪁🌊💨", "Ünïcödé ßtraße ñ", long.as_str()] {
            let msg = agent.process_query(text, None, &[]);
            assert!(!msg.content.is_empty());
        }

        let msg = agent.process_query("", None, &[]);
        assert_eq!(msg.intent(), Some(Intent::General));
        assert_eq!(msg.metadata.as_ref().unwrap().quick_replies.len(), 4);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let agent = KaiteAgent::with_defaults();
        assert_eq!(agent.classify("beginner spots with waves"), Some(Intent::Beginner));
        assert_eq!(agent.classify("how much wind for waves"), Some(Intent::Wind));
        assert_eq!(agent.classify("surf trip please"), Some(Intent::Waves));
        assert_eq!(agent.classify("book a trip to Greece"), Some(Intent::Booking));
        assert_eq!(agent.classify("tell me about Sardinia"), Some(Intent::Destination));
        assert_eq!(agent.classify("Tarifa?"), Some(Intent::Destination));
        assert_eq!(agent.classify("hello there"), None);
    }

    #[test]
    fn test_wind_speed_filters_spots() {
        let agent = KaiteAgent::with_defaults();
        let msg = agent.process_query("Where is 28 knots of wind?", None, &[]);
        assert_eq!(msg.intent(), Some(Intent::Wind));
        let spots = default_kitespots();
        for rec in msg.recommendations() {
            let spot = spots.iter().find(|s| s.id == rec.spot_id).unwrap();
            assert!(spot.wind.contains(28));
        }
        assert!(msg.content.starts_with("28 knots"));
    }

    #[test]
    fn test_uncovered_wind_speed_gets_no_match_reply() {
        let agent = KaiteAgent::with_defaults();
        for text in ["Where can I ride 55 knots?", "any spot with 6 knots of wind"] {
            let msg = agent.process_query(text, None, &[]);
            assert_eq!(msg.intent(), Some(Intent::Wind));
            assert_ne!(msg.content, replies::APOLOGY);
            assert!(msg.recommendations().is_empty());
            assert!(!msg.metadata.as_ref().unwrap().quick_replies.is_empty());
        }
        let msg = agent.process_query("Where can I ride 55 knots?", None, &[]);
        assert!(msg.content.starts_with("None of our spots regularly sees 55 knots"));
    }

    #[test]
    fn test_query_is_clipped_to_max_chars() {
        let agent = KaiteAgent::new(default_kitespots(), AgentConfig { max_query_chars: 5, ..AgentConfig::default() });
        assert_eq!(agent.clip_query("  waves please  "), "waves");
        assert_eq!(agent.clip_query("🪁🌊💨🪁🌊💨"), "🪁🌊💨🪁🌊");
    }

    #[test]
    fn test_booking_lists_available_trips_only() {
        let agent = KaiteAgent::with_defaults();
        let mut trips = trips();
        trips[1].reserve(6).unwrap();

        let msg = agent.process_query("Which dates can I book?", None, &trips);
        let booked = msg.booking_recommendations();
        assert_eq!(booked.len(), 1);
        assert_eq!(booked[0].destination, Destination::Greece);
        let buttons = &msg.metadata.as_ref().unwrap().buttons;
        assert_eq!(buttons[0].action, CtaAction::BookTrip);

        trips[0].reserve(6).unwrap();
        let msg = agent.process_query("Which dates can I book?", None, &trips);
        assert!(msg.booking_recommendations().is_empty());
        assert_eq!(msg.metadata.as_ref().unwrap().buttons[0].action, CtaAction::ContactTeam);
    }

    #[test]
    fn test_handler_error_becomes_apology() {
        let agent = KaiteAgent::with_defaults();
        let profile = UserProfile {
            wind_range: Some(WindRange::new(30, 10)),
            ..UserProfile::default()
        };

        let msg = agent.process_query("waves please", Some(&profile), &[]);
        assert_eq!(msg.content, replies::APOLOGY);
        assert!(msg.recommendations().is_empty());
        assert_eq!(msg.metadata.as_ref().unwrap().buttons[0].action, CtaAction::ContactTeam);
    }

    #[test]
    fn test_no_candidates_becomes_apology() {
        let agent = KaiteAgent::new(Vec::new(), AgentConfig::default());
        let msg = agent.process_query("Show me beginner spots", None, &[]);
        assert_eq!(msg.content, replies::APOLOGY);
    }
}
