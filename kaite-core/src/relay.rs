use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::validation::FormValues;

/// Contact form payload, in the website's camelCase shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl FormValues for ContactSubmission {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "firstName" => Some(&self.first_name),
            "lastName" => Some(&self.last_name),
            "email" => Some(&self.email),
            "phone" => Some(&self.phone),
            "subject" => Some(&self.subject),
            "message" => Some(&self.message),
            "destination" => self.destination.as_deref(),
            "source" => self.source.as_deref(),
            "recipient" => self.recipient.as_deref(),
            "userAgent" => self.user_agent.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadSubmission {
    pub email: String,
    #[serde(default = "default_lead_source")]
    pub source: String,
}

fn default_lead_source() -> String {
    "website".to_string()
}

impl FormValues for LeadSubmission {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "email" => Some(&self.email),
            "source" => Some(&self.source),
            _ => None,
        }
    }
}

/// `{success, error?}` as answered by the form endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()) }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RelayError {
    #[error("Form endpoint timed out after {0} ms")]
    Timeout(u64),
    #[error("Form endpoint unreachable: {0}")]
    Transport(String),
    #[error("Form endpoint rejected the submission ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected response from form endpoint: {0}")]
    InvalidResponse(String),
}

/// Outbound delivery of website forms
#[async_trait]
pub trait FormRelay: Send + Sync {
    async fn submit_contact(&self, submission: &ContactSubmission) -> Result<RelayResponse, RelayError>;

    async fn submit_lead(&self, lead: &LeadSubmission) -> Result<RelayResponse, RelayError>;
}
