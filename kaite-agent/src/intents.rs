use kaite_catalog::{Destination, KiteSpot};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentError, KaiteAgent, Reply};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Beginner,
    Wind,
    Waves,
    Booking,
    Destination,
    General,
}

/// A user message after normalisation: lowercased, truncated, tokenised.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub original: String,
    pub normalized: String,
    pub tokens: Vec<String>,
}

impl QueryContext {
    pub fn parse(text: &str, max_chars: usize) -> Self {
        let original = Self::clip(text, max_chars);
        let lowered = original.to_lowercase();
        let tokens: Vec<String> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        let normalized = tokens.join(" ");

        Self { original, normalized, tokens }
    }

    /// Trim and cut to at most `max_chars` characters
    pub fn clip(text: &str, max_chars: usize) -> String {
        text.trim().chars().take(max_chars).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Multi-word keywords match as a phrase on token boundaries; single
    /// words match any token starting with them ("learn" matches "learning").
    pub fn mentions(&self, keyword: &str) -> bool {
        if keyword.contains(' ') {
            format!(" {} ", self.normalized).contains(&format!(" {} ", keyword))
        } else {
            self.tokens.iter().any(|t| t.starts_with(keyword))
        }
    }

    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.mentions(k))
    }

    /// First number in the message that looks like a wind speed in knots
    pub fn wind_speed(&self) -> Option<u32> {
        self.tokens
            .iter()
            .filter_map(|t| t.trim_end_matches("kn").trim_end_matches("kts").parse::<u32>().ok())
            .find(|n| (5..=60).contains(n))
    }

    /// Destinations named in the message, in catalog order
    pub fn destinations(&self) -> Vec<Destination> {
        Destination::ALL
            .into_iter()
            .filter(|d| self.mentions(d.slug()) || destination_aliases(*d).iter().any(|a| self.mentions(a)))
            .collect()
    }

    /// Spots named in the message, in catalog order
    pub fn spots<'a>(&self, spots: &'a [KiteSpot]) -> Vec<&'a KiteSpot> {
        spots
            .iter()
            .filter(|s| {
                let name = s.name.to_lowercase();
                self.mentions(&name) || self.mentions(&s.id.replace('-', " "))
            })
            .collect()
    }
}

fn destination_aliases(destination: Destination) -> &'static [&'static str] {
    match destination {
        Destination::Caribbean => &["grenadines", "caribe"],
        Destination::Sardinia => &["sardegna", "sardinien"],
        Destination::Greece => &["greek", "cyclades", "aegean"],
        Destination::Brazil => &["brasil", "ceara"],
        Destination::Egypt => &["red sea", "hurghada"],
    }
}

pub(crate) const BEGINNER_KEYWORDS: &[&str] = &["beginner", "learn", "newbie", "novice", "lesson", "first time", "never kited", "easy"];
pub(crate) const WIND_KEYWORDS: &[&str] = &["wind", "knot", "breez", "gust", "meltemi", "mistral", "trade winds"];
pub(crate) const WAVE_KEYWORDS: &[&str] = &["wave", "swell", "surf", "ocean"];
pub(crate) const BOOKING_KEYWORDS: &[&str] = &["book", "reserv", "availab", "price", "cost", "how much", "trip", "cabin", "berth", "dates"];

pub type Predicate = fn(&KaiteAgent, &QueryContext) -> bool;
pub type Handler = fn(&KaiteAgent, &QueryContext, &crate::agent::Request<'_>) -> Result<Reply, AgentError>;

/// One entry in the priority-ordered dispatch list
#[derive(Clone)]
pub struct IntentRule {
    pub intent: Intent,
    pub predicate: Predicate,
    pub handler: Handler,
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule").field("intent", &self.intent).finish()
    }
}

fn is_beginner(_: &KaiteAgent, q: &QueryContext) -> bool {
    q.mentions_any(BEGINNER_KEYWORDS)
}

fn is_wind(_: &KaiteAgent, q: &QueryContext) -> bool {
    q.mentions_any(WIND_KEYWORDS)
}

fn is_waves(_: &KaiteAgent, q: &QueryContext) -> bool {
    q.mentions_any(WAVE_KEYWORDS)
}

fn is_booking(_: &KaiteAgent, q: &QueryContext) -> bool {
    q.mentions_any(BOOKING_KEYWORDS)
}

fn is_destination(agent: &KaiteAgent, q: &QueryContext) -> bool {
    !q.destinations().is_empty() || !q.spots(agent.spots()).is_empty()
}

/// Dispatch order: the first rule whose predicate matches handles the message
pub fn default_rules() -> Vec<IntentRule> {
    use crate::agent::handlers;

    vec![
        IntentRule { intent: Intent::Beginner, predicate: is_beginner, handler: handlers::beginner },
        IntentRule { intent: Intent::Wind, predicate: is_wind, handler: handlers::wind },
        IntentRule { intent: Intent::Waves, predicate: is_waves, handler: handlers::waves },
        IntentRule { intent: Intent::Booking, predicate: is_booking, handler: handlers::booking },
        IntentRule { intent: Intent::Destination, predicate: is_destination, handler: handlers::destination },
    ]
}
