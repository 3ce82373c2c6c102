pub mod app_config;
pub mod trip_repo;
pub mod session_repo;
pub mod relay;
pub mod events;

pub use app_config::Config;
pub use trip_repo::InMemoryTripRepository;
pub use session_repo::ChatSessionStore;
pub use relay::{relay_from_config, HttpFormRelay, LoggingRelay};
pub use events::EventBus;

use kaite_catalog::seed::{default_trips, trips_from_json};
use kaite_catalog::{Trip, TripError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read trips file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid trips file: {0}")]
    Trips(#[from] TripError),
}

/// Trips from `catalog.trips_file` when set, else the built-in season
pub fn load_trips(config: &app_config::CatalogConfig) -> Result<Vec<Trip>, StoreError> {
    match &config.trips_file {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let trips = trips_from_json(&json)?;
            tracing::info!("Loaded {} trips from {}", trips.len(), path);
            Ok(trips)
        }
        None => Ok(default_trips()),
    }
}
