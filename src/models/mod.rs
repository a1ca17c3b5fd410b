//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod registration;
pub mod registration_config;

// Re-export commonly used models
pub use event::{Event, EventStatus, EventCursor, EventPage, CreateEventRequest, UpdateEventRequest};
pub use registration::{
    EventRegistration, RegistrationStatus, SubmitRegistrationRequest,
    UpdateRegistrationStatusRequest, CapacityRule, resolve_status,
};
pub use registration_config::{RegistrationConfig, ConfirmationSettings, FieldDefinition, FieldType, ShowWhen};
