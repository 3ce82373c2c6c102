use kaite_shared::models::CatalogEvent;
use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 100;

/// In-process fan-out of catalog events to SSE subscribers.
///
/// Slow subscribers miss events (`Lagged`) rather than blocking publishers.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Handle for services that publish on their own
    pub fn sender(&self) -> broadcast::Sender<CatalogEvent> {
        self.tx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.tx.subscribe()
    }

    /// Returns how many subscribers received the event
    pub fn publish(&self, event: CatalogEvent) -> usize {
        let name = event.name();
        match self.tx.send(event) {
            Ok(n) => n,
            Err(_) => {
                debug!("No subscribers for {} event", name);
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
