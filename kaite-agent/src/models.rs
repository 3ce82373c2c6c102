use chrono::{DateTime, NaiveDate, Utc};
use kaite_catalog::{Destination, Trip};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::intents::Intent;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Suggestion chip; `value` is sent back as the next user message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuickReply {
    pub label: String,
    pub value: String,
}

impl QuickReply {
    pub fn new(label: &str) -> Self {
        Self { label: label.to_string(), value: label.to_string() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CtaAction {
    ViewSpot,
    BookTrip,
    BrowseTrips,
    ContactTeam,
}

/// Button rendered under an assistant message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallToAction {
    pub label: String,
    pub action: CtaAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl CallToAction {
    pub fn new(label: impl Into<String>, action: CtaAction) -> Self {
        Self { label: label.into(), action, target: None }
    }

    pub fn targeting(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpotRecommendation {
    pub spot_id: String,
    pub name: String,
    pub country: String,
    pub match_score: f64,
    pub description: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripRecommendation {
    pub trip_id: Uuid,
    pub title: String,
    pub destination: Destination,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available_spots: u32,
    pub price_minor: i64,
    pub discounted_price_minor: i64,
    pub currency: String,
}

impl From<&Trip> for TripRecommendation {
    fn from(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id,
            title: trip.title.clone(),
            destination: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            available_spots: trip.available_spots,
            price_minor: trip.price_minor,
            discounted_price_minor: trip.discounted_price(),
            currency: trip.currency.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<SpotRecommendation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub booking_recommendations: Vec<TripRecommendation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_replies: Vec<QuickReply>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<CallToAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn assistant(content: impl Into<String>, metadata: MessageMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: Some(metadata),
        }
    }

    pub fn recommendations(&self) -> &[SpotRecommendation] {
        self.metadata.as_ref().map(|m| m.recommendations.as_slice()).unwrap_or(&[])
    }

    pub fn booking_recommendations(&self) -> &[TripRecommendation] {
        self.metadata.as_ref().map(|m| m.booking_recommendations.as_slice()).unwrap_or(&[])
    }

    pub fn intent(&self) -> Option<Intent> {
        self.metadata.as_ref().and_then(|m| m.intent)
    }
}

/// Append-only transcript for one visitor. Oldest messages fall off past `max_messages`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub id: Uuid,
    messages: VecDeque<ChatMessage>,
    #[serde(skip)]
    max_messages: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(max_messages: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            messages: VecDeque::new(),
            max_messages: max_messages.max(1),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > self.max_messages {
            self.messages.pop_front();
        }
        self.updated_at = Utc::now();
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }
}
