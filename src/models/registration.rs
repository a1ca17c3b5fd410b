//! Event registration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::registration_config::RegistrationConfig;
use crate::utils::errors::{Result, TourneyHubError};

/// One attendee's submitted response against an event's registration schema.
///
/// `form_data` is keyed by field id; its shape is dictated by the owning
/// event's config at submission time. No schema snapshot is retained per
/// registration, so later config edits do not retroactively invalidate old
/// rows. Contact fields are duplicated out of the form data for query
/// convenience. Rows are never hard-deleted: cancellation is a status.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRegistration {
    pub id: Uuid,
    pub event_id: i64,
    pub status: String,
    pub form_data: Json<Map<String, Value>>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
}

/// Registration lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
    Waitlisted,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
            RegistrationStatus::Waitlisted => "waitlisted",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            "waitlisted" => Ok(RegistrationStatus::Waitlisted),
            "cancelled" => Ok(RegistrationStatus::Cancelled),
            other => Err(TourneyHubError::InvalidInput(format!(
                "Unknown registration status: {other}"
            ))),
        }
    }

    /// Whether this row still consumes a capacity slot
    pub fn counts_toward_capacity(&self) -> bool {
        !matches!(self, RegistrationStatus::Rejected | RegistrationStatus::Cancelled)
    }

    /// Approver-driven lifecycle transitions
    pub fn can_transition_to(&self, next: RegistrationStatus) -> bool {
        match self {
            RegistrationStatus::Pending => matches!(
                next,
                RegistrationStatus::Approved
                    | RegistrationStatus::Rejected
                    | RegistrationStatus::Waitlisted
                    | RegistrationStatus::Cancelled
            ),
            RegistrationStatus::Waitlisted => matches!(
                next,
                RegistrationStatus::Approved | RegistrationStatus::Cancelled
            ),
            RegistrationStatus::Approved => matches!(next, RegistrationStatus::Cancelled),
            RegistrationStatus::Rejected | RegistrationStatus::Cancelled => false,
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attendee-facing submission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRegistrationRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub form_data: Map<String, Value>,
}

/// Approver-facing status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRegistrationStatusRequest {
    pub status: String,
    pub approved_by: Option<String>,
}

/// Capacity policy snapshot handed to the store for the atomic insert
#[derive(Debug, Clone, Copy)]
pub struct CapacityRule {
    pub max_registrations: Option<i32>,
    pub allow_waitlist: bool,
    pub require_approval: bool,
}

impl CapacityRule {
    pub fn from_config(config: &RegistrationConfig) -> Self {
        Self {
            max_registrations: config.max_registrations,
            allow_waitlist: config.allow_waitlist,
            require_approval: config.require_approval,
        }
    }
}

/// Resolve the status of a new registration given the number of active
/// registrations already held. Evaluated inside the store transaction that
/// locks the event row, so the count cannot move underneath it.
pub fn resolve_status(rule: &CapacityRule, active_count: i64) -> Result<RegistrationStatus> {
    let at_capacity = match rule.max_registrations {
        Some(max) => active_count >= max as i64,
        None => false,
    };

    if at_capacity {
        if rule.allow_waitlist {
            return Ok(RegistrationStatus::Waitlisted);
        }
        return Err(TourneyHubError::CapacityExceeded);
    }

    if rule.require_approval {
        Ok(RegistrationStatus::Pending)
    } else {
        Ok(RegistrationStatus::Approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn rule(max: Option<i32>, waitlist: bool, approval: bool) -> CapacityRule {
        CapacityRule {
            max_registrations: max,
            allow_waitlist: waitlist,
            require_approval: approval,
        }
    }

    #[test]
    fn test_under_capacity_is_approved_without_approval_gate() {
        assert_matches!(
            resolve_status(&rule(Some(10), false, false), 3),
            Ok(RegistrationStatus::Approved)
        );
    }

    #[test]
    fn test_under_capacity_is_pending_with_approval_gate() {
        assert_matches!(
            resolve_status(&rule(Some(10), false, true), 3),
            Ok(RegistrationStatus::Pending)
        );
    }

    #[test]
    fn test_at_capacity_waitlists_when_allowed() {
        assert_matches!(
            resolve_status(&rule(Some(10), true, false), 10),
            Ok(RegistrationStatus::Waitlisted)
        );
    }

    #[test]
    fn test_at_capacity_rejects_without_waitlist() {
        // The (K+1)-th attempt against max K must be a capacity rejection.
        assert_matches!(
            resolve_status(&rule(Some(10), false, false), 10),
            Err(TourneyHubError::CapacityExceeded)
        );
    }

    #[test]
    fn test_no_capacity_limit_never_rejects() {
        assert_matches!(
            resolve_status(&rule(None, false, false), 100_000),
            Ok(RegistrationStatus::Approved)
        );
    }

    #[test]
    fn test_status_transitions() {
        use RegistrationStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Waitlisted.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Approved));
    }

    #[test]
    fn test_capacity_counting_excludes_terminal_rows() {
        use RegistrationStatus::*;
        assert!(Pending.counts_toward_capacity());
        assert!(Approved.counts_toward_capacity());
        assert!(Waitlisted.counts_toward_capacity());
        assert!(!Rejected.counts_toward_capacity());
        assert!(!Cancelled.counts_toward_capacity());
    }
}
