use chrono::Utc;
use kaite_core::forms::{contact_form, lead_capture};
use kaite_core::{ContactSubmission, CoreResult, FormRelay, LeadSubmission, RelayResponse};
use kaite_shared::models::{CatalogEvent, LeadCapturedEvent};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Validates website forms and hands them to the configured relay
#[derive(Clone)]
pub struct ContactService {
    relay: Arc<dyn FormRelay>,
    events: Option<broadcast::Sender<CatalogEvent>>,
}

impl ContactService {
    pub fn new(relay: Arc<dyn FormRelay>) -> Self {
        Self { relay, events: None }
    }

    pub fn with_events(mut self, events: broadcast::Sender<CatalogEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Contact form: invalid input never reaches the relay, relay errors are
    /// returned to the caller.
    pub async fn submit_contact(&self, submission: &ContactSubmission) -> CoreResult<RelayResponse> {
        contact_form().check(submission)?;

        let response = self.relay.submit_contact(submission).await?;
        if response.success {
            info!("Contact request relayed (subject: {:?})", submission.subject);
        } else {
            warn!("Contact endpoint declined submission: {:?}", response.error);
        }
        Ok(response)
    }

    /// Lead capture is best-effort: only validation can fail it.
    pub async fn capture_lead(&self, lead: &LeadSubmission) -> CoreResult<RelayResponse> {
        lead_capture().check(lead)?;

        let relayed = match self.relay.submit_lead(lead).await {
            Ok(response) if response.success => true,
            Ok(response) => {
                warn!("Lead endpoint declined {} lead: {:?}", lead.source, response.error);
                false
            }
            Err(e) => {
                warn!("Lead relay failed for {} lead: {}", lead.source, e);
                false
            }
        };

        if let Some(events) = &self.events {
            let _ = events.send(CatalogEvent::LeadCaptured(LeadCapturedEvent {
                source: lead.source.clone(),
                relayed,
                timestamp: Utc::now().timestamp(),
            }));
        }

        Ok(RelayResponse::ok())
    }
}
