//! Reminder run handler
//!
//! Invoked by the external time-based trigger. A run with no matching
//! events is a distinct success, not an error.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::utils::errors::Result;

use super::AppState;

/// Execute one reminder run
pub async fn run_reminders(State(state): State<AppState>) -> Result<Json<Value>> {
    let report = state.services.reminder_service.run().await?;

    if report.events_checked == 0 {
        return Ok(Json(json!({
            "success": true,
            "message": "No events starting on the target day",
        })));
    }

    Ok(Json(json!({
        "success": true,
        "events_checked": report.events_checked,
        "reminders_sent": report.reminders_sent,
        "reminders_failed": report.reminders_failed,
    })))
}
