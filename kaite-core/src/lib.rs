pub mod validation;
pub mod forms;
pub mod repository;
pub mod relay;

pub use validation::{FieldRule, FormSchema, FormValues, ValidationErrors};
pub use repository::TripRepository;
pub use relay::{ContactSubmission, FormRelay, LeadSubmission, RelayError, RelayResponse};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("Form relay failed: {0}")]
    Relay(#[from] RelayError),
    #[error("Internal service error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
