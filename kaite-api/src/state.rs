use anyhow::Context;
use kaite_agent::KaiteAgent;
use kaite_booking::{BookingService, ContactService};
use kaite_catalog::kitespot::default_kitespots;
use kaite_catalog::{MerchCatalog, PricingEngine};
use kaite_core::TripRepository;
use kaite_store::{relay_from_config, ChatSessionStore, Config, EventBus, InMemoryTripRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub trip_repo: Arc<dyn TripRepository>,
    pub bookings: BookingService,
    pub contact: ContactService,
    pub agent: Arc<KaiteAgent>,
    pub sessions: Arc<ChatSessionStore>,
    pub merch: Arc<MerchCatalog>,
    pub events: EventBus,
    pub auth: AuthConfig,
    pub low_availability_threshold: u32,
}

impl AppState {
    /// Wire every service from configuration. Nothing here touches the network.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let Some(secret) = config.auth.secret() else {
            anyhow::bail!("auth.jwt_secret is not set (KAITE__AUTH__JWT_SECRET)");
        };

        let trips = kaite_store::load_trips(&config.catalog).context("Failed to load trip catalog")?;
        tracing::info!("Trip catalog ready with {} trips", trips.len());

        let trip_repo: Arc<dyn TripRepository> = Arc::new(InMemoryTripRepository::new(trips));
        let events = EventBus::default();

        let relay = relay_from_config(&config.relay).context("Failed to build form relay")?;

        Ok(Self {
            bookings: BookingService::new(
                trip_repo.clone(),
                PricingEngine::new(config.pricing.clone()),
                events.sender(),
            ),
            contact: ContactService::new(relay).with_events(events.sender()),
            agent: Arc::new(KaiteAgent::new(default_kitespots(), config.agent.clone())),
            sessions: Arc::new(ChatSessionStore::new(config.chat.max_messages, config.chat.max_sessions)),
            merch: Arc::new(MerchCatalog::with_defaults()),
            trip_repo,
            events,
            auth: AuthConfig {
                secret: secret.to_string(),
            },
            low_availability_threshold: config.catalog.low_availability_threshold,
        })
    }
}
