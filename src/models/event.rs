//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::registration_config::RegistrationConfig;
use crate::utils::datetime;
use crate::utils::errors::{Result, TourneyHubError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: Option<i32>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: String,
    pub organizer_id: Option<i64>,
    pub organizer_email: Option<String>,
    pub registration_config: Option<Json<RegistrationConfig>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// The embedded registration config, if one is present
    pub fn registration_config(&self) -> Option<&RegistrationConfig> {
        self.registration_config.as_ref().map(|json| &json.0)
    }
}

/// Event lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Draft,
    PendingReview,
    Published,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::PendingReview => "pending_review",
            EventStatus::Published => "published",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(EventStatus::Draft),
            "pending_review" => Ok(EventStatus::PendingReview),
            "published" => Ok(EventStatus::Published),
            "cancelled" => Ok(EventStatus::Cancelled),
            "completed" => Ok(EventStatus::Completed),
            other => Err(TourneyHubError::InvalidInput(format!(
                "Unknown event status: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: Option<i32>,
    #[serde(deserialize_with = "datetime::deserialize_instant")]
    pub start_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "datetime::deserialize_opt_instant")]
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub organizer_id: Option<i64>,
    pub organizer_email: Option<String>,
    pub registration_config: Option<RegistrationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: Option<i32>,
    #[serde(default, deserialize_with = "datetime::deserialize_opt_instant")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "datetime::deserialize_opt_instant")]
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub registration_config: Option<RegistrationConfig>,
}

/// Keyset pagination cursor over (start_date, id)
///
/// The cursor names the last row of the previous page, so the listing stays
/// stable under concurrent inserts at the tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCursor {
    pub start_date: DateTime<Utc>,
    pub id: i64,
}

impl EventCursor {
    pub fn from_event(event: &Event) -> Self {
        Self {
            start_date: event.start_date,
            id: event.id,
        }
    }

    pub fn encode(&self) -> String {
        format!("{}~{}", self.start_date.to_rfc3339(), self.id)
    }

    pub fn decode(s: &str) -> Result<Self> {
        let (date_part, id_part) = s
            .rsplit_once('~')
            .ok_or_else(|| TourneyHubError::InvalidInput(format!("Malformed cursor: {s}")))?;
        let start_date = datetime::parse_instant_str(date_part)?;
        let id = id_part
            .parse::<i64>()
            .map_err(|_| TourneyHubError::InvalidInput(format!("Malformed cursor: {s}")))?;
        Ok(Self { start_date, id })
    }
}

/// One page of an event listing
#[derive(Debug, Clone, Serialize)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_event_status_round_trip() {
        for status in [
            EventStatus::Draft,
            EventStatus::PendingReview,
            EventStatus::Published,
            EventStatus::Cancelled,
            EventStatus::Completed,
        ] {
            assert_eq!(EventStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(EventStatus::parse("archived").is_err());
    }

    #[test]
    fn test_cursor_round_trip() {
        let cursor = EventCursor {
            start_date: Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap(),
            id: 42,
        };
        let decoded = EventCursor::decode(&cursor.encode()).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_cursor_rejects_garbage() {
        assert!(EventCursor::decode("no-separator").is_err());
        assert!(EventCursor::decode("2025-05-01T10:00:00Z~not-a-number").is_err());
    }

    #[test]
    fn test_create_request_accepts_dual_date_representation() {
        let from_string: CreateEventRequest = serde_json::from_value(json!({
            "title": "Spring Open",
            "start_date": "2025-05-01T10:00:00Z"
        }))
        .unwrap();

        let from_millis: CreateEventRequest = serde_json::from_value(json!({
            "title": "Spring Open",
            "start_date": from_string.start_date.timestamp_millis()
        }))
        .unwrap();

        assert_eq!(from_string.start_date, from_millis.start_date);
        assert!(from_string.end_date.is_none());
    }
}
