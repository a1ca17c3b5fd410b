//! Error handling for TourneyHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use serde::Serialize;
use uuid::Uuid;

/// Main error type for the TourneyHub application
#[derive(Error, Debug)]
pub enum TourneyHubError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Email delivery error: {0}")]
    Email(#[from] EmailError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: Uuid },

    #[error("Registration closed: {0}")]
    RegistrationClosed(String),

    #[error("Registration deadline has passed")]
    DeadlinePassed,

    #[error("Event has reached its registration capacity")]
    CapacityExceeded,

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Submission failed validation")]
    Validation(Vec<FieldError>),

    #[error("Invalid date value: {0}")]
    InvalidDate(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A single field-level validation failure within a submission
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Email provider specific errors
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email provider request failed: {0}")]
    RequestFailed(String),

    #[error("Email provider timeout")]
    Timeout,

    #[error("Email provider unavailable")]
    ServiceUnavailable,

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for TourneyHub operations
pub type Result<T> = std::result::Result<T, TourneyHubError>;

/// Result type alias for email delivery operations
pub type EmailResult<T> = std::result::Result<T, EmailError>;

impl TourneyHubError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            TourneyHubError::Database(_) => false,
            TourneyHubError::Migration(_) => false,
            TourneyHubError::Email(_) => true,
            TourneyHubError::Config(_) => false,
            TourneyHubError::EventNotFound { .. } => false,
            TourneyHubError::RegistrationNotFound { .. } => false,
            TourneyHubError::RegistrationClosed(_) => false,
            TourneyHubError::DeadlinePassed => false,
            TourneyHubError::CapacityExceeded => false,
            TourneyHubError::InvalidStateTransition { .. } => false,
            TourneyHubError::Validation(_) => false,
            TourneyHubError::InvalidDate(_) => false,
            TourneyHubError::Http(_) => true,
            TourneyHubError::Serialization(_) => false,
            TourneyHubError::Io(_) => true,
            TourneyHubError::UrlParse(_) => false,
            TourneyHubError::InvalidInput(_) => false,
        }
    }

    /// Whether the error is the caller's fault rather than a server fault
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            TourneyHubError::EventNotFound { .. }
                | TourneyHubError::RegistrationNotFound { .. }
                | TourneyHubError::RegistrationClosed(_)
                | TourneyHubError::DeadlinePassed
                | TourneyHubError::CapacityExceeded
                | TourneyHubError::InvalidStateTransition { .. }
                | TourneyHubError::Validation(_)
                | TourneyHubError::InvalidDate(_)
                | TourneyHubError::InvalidInput(_)
        )
    }
}
