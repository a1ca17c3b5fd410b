//! Registration configuration model
//!
//! A `RegistrationConfig` is the per-event declarative schema controlling
//! which form fields, capacity, deadline, and approval rules apply to
//! registrations. It is embedded in the owning event and has no independent
//! lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::errors::{Result, TourneyHubError};

/// Per-event registration schema and policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_registrations: Option<i32>,
    #[serde(default)]
    pub allow_waitlist: bool,
    #[serde(default)]
    pub require_approval: bool,
    #[serde(default)]
    pub confirmation: ConfirmationSettings,
}

/// Confirmation email behavior for a single event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfirmationSettings {
    #[serde(default)]
    pub send_email: bool,
    #[serde(default)]
    pub reply_to: Option<String>,
}

/// One form field in a registration schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Choices for select/radio/checkbox fields
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Conditional visibility: the field only applies when another
    /// field currently holds the given value
    #[serde(default)]
    pub show_when: Option<ShowWhen>,
    /// Display and validation sequence
    #[serde(default)]
    pub order: i32,
}

/// Visibility condition referencing another field's submitted value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowWhen {
    pub field: String,
    pub equals: Value,
}

/// Fixed enumeration of supported form field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Phone,
    Number,
    Date,
    Select,
    Radio,
    Checkbox,
    File,
    Url,
}

impl RegistrationConfig {
    /// Fields in their declared validation sequence
    pub fn fields_in_order(&self) -> Vec<&FieldDefinition> {
        let mut fields: Vec<&FieldDefinition> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.order);
        fields
    }

    /// Whether the deadline, if any, has passed at `now`
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        matches!(self.deadline, Some(deadline) if now > deadline)
    }

    /// Structural validation: field ids must be unique within one config
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if field.id.trim().is_empty() {
                return Err(TourneyHubError::InvalidInput(
                    "Registration field id cannot be empty".to_string(),
                ));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(TourneyHubError::InvalidInput(format!(
                    "Duplicate registration field id: {}",
                    field.id
                )));
            }
        }
        Ok(())
    }
}
