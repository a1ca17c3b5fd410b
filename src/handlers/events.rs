//! Event listing and management handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::models::event::{CreateEventRequest, Event, EventCursor, EventPage, UpdateEventRequest};
use crate::utils::errors::{Result, TourneyHubError};

use super::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListEventsParams {
    pub limit: Option<i64>,
    /// Continuation cursor from the previous page's `next_cursor`
    pub after: Option<String>,
}

/// List upcoming published events with cursor pagination
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListEventsParams>,
) -> Result<Json<EventPage>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let after = params
        .after
        .as_deref()
        .map(EventCursor::decode)
        .transpose()?;

    let page = state.db.events.list_upcoming(limit, after).await?;
    Ok(Json(page))
}

/// Fetch one event; missing ids are a 404, not a server fault
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Event>> {
    let event = state
        .db
        .events
        .find_by_id(id)
        .await?
        .ok_or(TourneyHubError::EventNotFound { event_id: id })?;

    Ok(Json(event))
}

/// Create a new event
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<Json<Event>> {
    if request.title.trim().is_empty() {
        return Err(TourneyHubError::InvalidInput("Event title is required".to_string()));
    }
    if let Some(config) = &request.registration_config {
        config.validate()?;
    }

    let event = state.db.events.create(request).await?;
    Ok(Json(event))
}

/// Partially update an event
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    if let Some(config) = &request.registration_config {
        config.validate()?;
    }

    let event = state.db.events.update(id, request).await?;
    Ok(Json(event))
}
