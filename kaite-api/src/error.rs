use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kaite_booking::FunnelError;
use kaite_catalog::{BookingError, TripError};
use kaite_core::{CoreError, RelayError, ValidationErrors};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    BadRequest(String),
    ValidationError(ValidationErrors),
    Unprocessable(String),
    NotFoundError(String),
    ConflictError(String),
    Booking(BookingError),
    GatewayError(RelayError),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": errors.to_string(), "fields": errors }),
            ),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": msg })),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Booking(err) => {
                let status = match err {
                    BookingError::NotFound(_) => StatusCode::NOT_FOUND,
                    BookingError::InsufficientAvailability { .. } => StatusCode::CONFLICT,
                    BookingError::InvalidPartySize(_) => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, json!({ "error": err.to_string(), "code": err.code() }))
            }
            AppError::GatewayError(err) => {
                tracing::warn!("Form relay failed: {}", err);
                (StatusCode::BAD_GATEWAY, json!({ "success": false, "error": err.to_string() }))
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError::Booking(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(errors)
    }
}

impl From<TripError> for AppError {
    fn from(err: TripError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<FunnelError> for AppError {
    fn from(err: FunnelError) -> Self {
        match err {
            FunnelError::Validation(errors) => AppError::ValidationError(errors),
            FunnelError::Booking(e) => AppError::Booking(e),
            e @ FunnelError::TripUnavailable(_) => AppError::ConflictError(e.to_string()),
            FunnelError::Pricing(e) => AppError::Unprocessable(e.to_string()),
            e @ FunnelError::InvalidTransition { .. } => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => AppError::ValidationError(errors),
            CoreError::Relay(e) => AppError::GatewayError(e),
            CoreError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}
