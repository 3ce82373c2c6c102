use kaite_agent::AgentConfig;
use kaite_catalog::PricingConfig;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// JSON trip list; the built-in season is used when unset
    #[serde(default)]
    pub trips_file: Option<String>,
    #[serde(default = "default_low_availability")]
    pub low_availability_threshold: u32,
}

fn default_low_availability() -> u32 {
    kaite_catalog::trip::DEFAULT_LOW_AVAILABILITY
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            trips_file: None,
            low_availability_threshold: default_low_availability(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
    /// Live sessions kept in memory; the least recently used goes first
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_max_messages() -> usize {
    200
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            max_sessions: default_max_sessions(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    #[serde(default)]
    pub contact_url: Option<String>,
    #[serde(default)]
    pub leads_url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            contact_url: None,
            leads_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// No default secret: set `auth.jwt_secret` or `KAITE__AUTH__JWT_SECRET`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
}

impl AuthConfig {
    /// The configured secret, `None` when unset or blank
    pub fn secret(&self) -> Option<&str> {
        Some(self.jwt_secret.as_str()).filter(|s| !s.trim().is_empty())
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `KAITE__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("KAITE").separator("__"))
            .build()?;

        let mut config: Config = s.try_deserialize()?;
        config.pricing.cap_group_size();
        Ok(config)
    }
}
