use async_trait::async_trait;
use kaite_core::{ContactSubmission, FormRelay, LeadSubmission, RelayError, RelayResponse};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::app_config::RelayConfig;

const PREVIEW_CHAR_LIMIT: usize = 160;

/// POSTs form payloads as JSON to the configured endpoints.
///
/// Each request carries the configured timeout and is tried once. A form with
/// no endpoint is only logged.
pub struct HttpFormRelay {
    client: Client,
    contact_url: Option<String>,
    leads_url: Option<String>,
    timeout_ms: u64,
    fallback: LoggingRelay,
}

impl HttpFormRelay {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            contact_url: config.contact_url.clone(),
            leads_url: config.leads_url.clone(),
            timeout_ms: config.timeout_ms,
            fallback: LoggingRelay,
        })
    }

    async fn post<T: Serialize + Sync>(&self, url: &str, payload: &T) -> Result<RelayResponse, RelayError> {
        debug!("Relaying form to {}", url);

        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.map_transport_error(e))?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(RelayResponse::ok());
        }
        serde_json::from_slice(&body)
            .map_err(|e| RelayError::InvalidResponse(format!("{}: {}", e, body_preview(&body))))
    }

    fn map_transport_error(&self, error: reqwest::Error) -> RelayError {
        if error.is_timeout() {
            RelayError::Timeout(self.timeout_ms)
        } else {
            RelayError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl FormRelay for HttpFormRelay {
    async fn submit_contact(&self, submission: &ContactSubmission) -> Result<RelayResponse, RelayError> {
        match &self.contact_url {
            Some(url) => self.post(url, submission).await,
            None => self.fallback.submit_contact(submission).await,
        }
    }

    async fn submit_lead(&self, lead: &LeadSubmission) -> Result<RelayResponse, RelayError> {
        match &self.leads_url {
            Some(url) => self.post(url, lead).await,
            None => self.fallback.submit_lead(lead).await,
        }
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RelayError {
    // Endpoints answer `{success: false, error}` on rejection; fall back to the raw body
    let message = serde_json::from_slice::<RelayResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .unwrap_or_else(|| body_preview(body));

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => RelayError::Transport(format!("status {}: {}", status.as_u16(), message)),
        _ => RelayError::Rejected { status: status.as_u16(), message },
    }
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Accepts everything and writes a log line. Used when no endpoint is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRelay;

#[async_trait]
impl FormRelay for LoggingRelay {
    async fn submit_contact(&self, submission: &ContactSubmission) -> Result<RelayResponse, RelayError> {
        info!(
            subject = %submission.subject,
            destination = submission.destination.as_deref().unwrap_or("-"),
            "Contact form received (no endpoint configured)"
        );
        Ok(RelayResponse::ok())
    }

    async fn submit_lead(&self, lead: &LeadSubmission) -> Result<RelayResponse, RelayError> {
        info!(source = %lead.source, "Lead captured (no endpoint configured)");
        Ok(RelayResponse::ok())
    }
}

/// HTTP relay when any endpoint is configured, otherwise the logging relay
pub fn relay_from_config(config: &RelayConfig) -> Result<Arc<dyn FormRelay>, RelayError> {
    if config.contact_url.is_none() && config.leads_url.is_none() {
        info!("No form endpoints configured, submissions will only be logged");
        return Ok(Arc::new(LoggingRelay));
    }
    Ok(Arc::new(HttpFormRelay::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn relay(base: &str, timeout_ms: u64) -> HttpFormRelay {
        HttpFormRelay::new(&RelayConfig {
            contact_url: Some(format!("{}/contact", base)),
            leads_url: Some(format!("{}/leads", base)),
            timeout_ms,
        })
        .unwrap()
    }

    fn contact() -> ContactSubmission {
        serde_json::from_value(json!({
            "firstName": "Marta",
            "lastName": "Rossi",
            "email": "marta@example.com",
            "message": "Is the June trip good for beginners?",
            "userAgent": "test"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_posts_camel_case_json() {
        let router = Router::new()
            .route(
                "/contact",
                post(|Json(body): Json<Value>| async move {
                    if body["firstName"] == "Marta" && body["userAgent"] == "test" {
                        Json(json!({ "success": true }))
                    } else {
                        Json(json!({ "success": false, "error": "bad payload" }))
                    }
                }),
            )
            .route("/leads", post(|| async { "" }));
        let base = serve(router).await;
        let relay = relay(&base, 2000);

        assert_eq!(relay.submit_contact(&contact()).await.unwrap(), RelayResponse::ok());

        let lead = LeadSubmission { email: "a@b.co".into(), source: "footer".into() };
        assert!(relay.submit_lead(&lead).await.unwrap().success);
    }

    #[tokio::test]
    async fn test_rejection_and_timeout() {
        let router = Router::new()
            .route(
                "/contact",
                post(|| async {
                    (
                        axum::http::StatusCode::BAD_REQUEST,
                        Json(json!({ "success": false, "error": "Missing required fields" })),
                    )
                }),
            )
            .route(
                "/leads",
                post(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    Json(json!({ "success": true }))
                }),
            );
        let base = serve(router).await;
        let relay = relay(&base, 100);

        match relay.submit_contact(&contact()).await {
            Err(RelayError::Rejected { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Missing required fields");
            }
            other => panic!("unexpected {:?}", other),
        }

        let lead = LeadSubmission { email: "a@b.co".into(), source: "footer".into() };
        assert!(matches!(relay.submit_lead(&lead).await, Err(RelayError::Timeout(100))));
    }

    #[tokio::test]
    async fn test_unreachable_and_unconfigured() {
        let relay = relay("http://127.0.0.1:9", 500);
        assert!(matches!(relay.submit_contact(&contact()).await, Err(RelayError::Transport(_)) | Err(RelayError::Timeout(_))));

        let logging = relay_from_config(&RelayConfig::default()).unwrap();
        assert!(logging.submit_contact(&contact()).await.unwrap().success);
    }
}
