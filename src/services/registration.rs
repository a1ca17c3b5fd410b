//! Registration submission service
//!
//! Validates an attendee's submission against the owning event's field
//! schema, resolves capacity and approval policy through the store's
//! atomic insert, and optionally sends a confirmation email.

use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::{EventRepository, NewRegistration, RegistrationRepository};
use crate::models::event::{Event, EventStatus};
use crate::models::registration::{
    CapacityRule, EventRegistration, RegistrationStatus, SubmitRegistrationRequest,
    UpdateRegistrationStatusRequest,
};
use crate::models::registration_config::{FieldDefinition, FieldType, RegistrationConfig};
use crate::services::email::EmailService;
use crate::utils::datetime;
use crate::utils::errors::{FieldError, Result, TourneyHubError};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 ().-]{5,19}$").unwrap())
}

/// Registration submission and lifecycle service
#[derive(Debug, Clone)]
pub struct RegistrationService {
    events: EventRepository,
    registrations: RegistrationRepository,
    email: EmailService,
}

impl RegistrationService {
    pub fn new(
        events: EventRepository,
        registrations: RegistrationRepository,
        email: EmailService,
    ) -> Self {
        Self {
            events,
            registrations,
            email,
        }
    }

    /// Submit one attendee registration against an event.
    ///
    /// Deadline and capacity rejections are user-facing conditions, not
    /// server faults. A confirmation email failure is logged and does not
    /// fail the submission.
    pub async fn submit(
        &self,
        event_id: i64,
        request: SubmitRegistrationRequest,
    ) -> Result<EventRegistration> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(TourneyHubError::EventNotFound { event_id })?;

        let config = registration_config(&event)?;

        if config.deadline_passed(Utc::now()) {
            return Err(TourneyHubError::DeadlinePassed);
        }

        let mut errors = validate_contact(&request);
        errors.extend(validate_form_data(config, &request.form_data));
        if !errors.is_empty() {
            return Err(TourneyHubError::Validation(errors));
        }

        let rule = CapacityRule::from_config(config);
        let registration = self
            .registrations
            .create_for_event(
                event_id,
                rule,
                NewRegistration {
                    email: request.email.trim().to_string(),
                    first_name: request.first_name.trim().to_string(),
                    last_name: request.last_name.trim().to_string(),
                    form_data: request.form_data,
                },
            )
            .await?;

        info!(
            event_id = event_id,
            registration_id = %registration.id,
            status = %registration.status,
            "Registration created"
        );

        if config.confirmation.send_email {
            self.send_confirmation(&event, &registration, config).await;
        }

        Ok(registration)
    }

    /// Approver-driven status transition
    pub async fn update_status(
        &self,
        registration_id: Uuid,
        request: UpdateRegistrationStatusRequest,
    ) -> Result<EventRegistration> {
        let registration = self
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or(TourneyHubError::RegistrationNotFound { registration_id })?;

        let current = RegistrationStatus::parse(&registration.status)?;
        let next = RegistrationStatus::parse(&request.status)?;

        if !current.can_transition_to(next) {
            return Err(TourneyHubError::InvalidStateTransition {
                from: current.to_string(),
                to: next.to_string(),
            });
        }

        let updated = self
            .registrations
            .update_status(registration_id, next, request.approved_by)
            .await?;

        info!(
            registration_id = %registration_id,
            from = %current,
            to = %next,
            "Registration status updated"
        );

        Ok(updated)
    }

    /// All registrations for one event (organizer view)
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<EventRegistration>> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(TourneyHubError::EventNotFound { event_id });
        }
        self.registrations.list_for_event(event_id).await
    }

    async fn send_confirmation(
        &self,
        event: &Event,
        registration: &EventRegistration,
        config: &RegistrationConfig,
    ) {
        let (subject, html) = build_confirmation_email(event, registration);
        let result = self
            .email
            .send_with_reply_to(
                &registration.email,
                &subject,
                &html,
                config.confirmation.reply_to.clone(),
            )
            .await;

        if let Err(e) = result {
            warn!(
                registration_id = %registration.id,
                error = %e,
                "Confirmation email failed; registration kept"
            );
        }
    }
}

/// Resolve the event's registration config, rejecting closed events
fn registration_config(event: &Event) -> Result<&RegistrationConfig> {
    if EventStatus::parse(&event.status)? != EventStatus::Published {
        return Err(TourneyHubError::RegistrationClosed(format!(
            "Event is not published (status: {})",
            event.status
        )));
    }

    match event.registration_config() {
        Some(config) if config.enabled => Ok(config),
        Some(_) => Err(TourneyHubError::RegistrationClosed(
            "Registration is disabled for this event".to_string(),
        )),
        None => Err(TourneyHubError::RegistrationClosed(
            "Event does not accept registrations".to_string(),
        )),
    }
}

/// Validate the fixed contact fields
fn validate_contact(request: &SubmitRegistrationRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !email_regex().is_match(request.email.trim()) {
        errors.push(FieldError::new("email", "A valid email address is required"));
    }
    if request.first_name.trim().is_empty() {
        errors.push(FieldError::new("first_name", "First name is required"));
    }
    if request.last_name.trim().is_empty() {
        errors.push(FieldError::new("last_name", "Last name is required"));
    }
    errors
}

/// Data-driven validation of submitted form values against the schema.
///
/// Fields hidden by a `show_when` condition are neither required nor
/// validated. All failures are collected and reported together.
pub fn validate_form_data(
    config: &RegistrationConfig,
    form_data: &Map<String, Value>,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for field in config.fields_in_order() {
        if !is_visible(field, form_data) {
            continue;
        }

        let value = form_data.get(&field.id);
        let blank = is_blank(value);

        if blank {
            if field.required {
                errors.push(FieldError::new(&field.id, format!("{} is required", field.label)));
            }
            continue;
        }

        if let Some(message) = check_value(field, value.unwrap()) {
            errors.push(FieldError::new(&field.id, message));
        }
    }

    errors
}

fn is_visible(field: &FieldDefinition, form_data: &Map<String, Value>) -> bool {
    match &field.show_when {
        Some(cond) => form_data.get(&cond.field) == Some(&cond.equals),
        None => true,
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Per-type constraint check; returns an error message on failure
fn check_value(field: &FieldDefinition, value: &Value) -> Option<String> {
    match field.field_type {
        FieldType::Text | FieldType::Textarea | FieldType::File => match value {
            Value::String(_) => None,
            _ => Some(format!("{} must be text", field.label)),
        },
        FieldType::Email => match value.as_str() {
            Some(s) if email_regex().is_match(s.trim()) => None,
            _ => Some(format!("{} must be a valid email address", field.label)),
        },
        FieldType::Phone => match value.as_str() {
            Some(s) if phone_regex().is_match(s.trim()) => None,
            _ => Some(format!("{} must be a valid phone number", field.label)),
        },
        FieldType::Number => match value {
            Value::Number(_) => None,
            Value::String(s) if s.trim().parse::<f64>().is_ok() => None,
            _ => Some(format!("{} must be a number", field.label)),
        },
        FieldType::Date => match datetime::parse_instant(value) {
            Ok(_) => None,
            Err(_) => Some(format!("{} must be a valid date", field.label)),
        },
        FieldType::Select | FieldType::Radio => match value.as_str() {
            Some(s) if field.options.iter().any(|o| o == s) => None,
            _ => Some(format!("{} must be one of the offered options", field.label)),
        },
        FieldType::Checkbox => match value {
            Value::Bool(_) => None,
            Value::Array(items) => {
                let all_known = items.iter().all(|item| {
                    item.as_str()
                        .map(|s| field.options.iter().any(|o| o == s))
                        .unwrap_or(false)
                });
                if all_known {
                    None
                } else {
                    Some(format!("{} contains an unknown option", field.label))
                }
            }
            _ => Some(format!("{} must be a checkbox value", field.label)),
        },
        FieldType::Url => match value.as_str() {
            Some(s) if url::Url::parse(s.trim()).is_ok() => None,
            _ => Some(format!("{} must be a valid URL", field.label)),
        },
    }
}

/// Build the confirmation email for a created registration
pub fn build_confirmation_email(event: &Event, registration: &EventRegistration) -> (String, String) {
    let subject = format!("Registration received: {}", event.title);
    let status_line = match registration.status.as_str() {
        "approved" => "Your spot is confirmed.",
        "pending" => "Your registration is awaiting organizer approval.",
        "waitlisted" => "The event is full; you have been placed on the waitlist.",
        _ => "Your registration has been recorded.",
    };

    let html = format!(
        "<h2>{title}</h2>\
         <p>Hi {first_name},</p>\
         <p>{status_line}</p>\
         <p><strong>When:</strong> {when}<br>\
         <strong>Where:</strong> {location}</p>",
        title = event.title,
        first_name = registration.first_name,
        status_line = status_line,
        when = datetime::format_long(&event.start_date),
        location = event.location.as_deref().unwrap_or("To be announced"),
    );

    (subject, html)
}
