pub mod models;
pub mod funnel;
pub mod service;
pub mod contact;

pub use models::{BookingConfirmation, BookingForm, BookingStep, QuoteRequest};
pub use funnel::{BookingFunnel, FunnelError};
pub use service::BookingService;
pub use contact::ContactService;
