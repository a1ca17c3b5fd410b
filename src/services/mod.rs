//! Services module
//!
//! This module contains business logic services

pub mod email;
pub mod registration;
pub mod reminder;

// Re-export commonly used services
pub use email::{EmailService, EmailPayload, SendReceipt};
pub use registration::RegistrationService;
pub use reminder::{ReminderService, ReminderReport};

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub email_service: EmailService,
    pub registration_service: RegistrationService,
    pub reminder_service: ReminderService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, database: &DatabaseService) -> Result<Self> {
        let email_service = EmailService::new(settings.email.clone())?;
        let registration_service = RegistrationService::new(
            database.events.clone(),
            database.registrations.clone(),
            email_service.clone(),
        );
        let reminder_service = ReminderService::new(
            database.events.clone(),
            database.registrations.clone(),
            email_service.clone(),
            settings.reminders.clone(),
        );

        Ok(Self {
            email_service,
            registration_service,
            reminder_service,
        })
    }
}
