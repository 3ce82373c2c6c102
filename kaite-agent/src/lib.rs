pub mod models;
pub mod profile;
pub mod intents;
pub mod ranker;
pub mod replies;
pub mod agent;

pub use models::{CallToAction, ChatMessage, ChatRole, ChatSession, CtaAction, MessageMetadata, QuickReply, SpotRecommendation, TripRecommendation};
pub use profile::{BudgetTier, UserProfile};
pub use intents::{Intent, IntentRule, QueryContext};
pub use ranker::{RankingWeights, SpotRanker};
pub use agent::{AgentConfig, AgentError, KaiteAgent};
