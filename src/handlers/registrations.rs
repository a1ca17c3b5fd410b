//! Registration submission and lifecycle handlers

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::models::registration::{
    EventRegistration, SubmitRegistrationRequest, UpdateRegistrationStatusRequest,
};
use crate::utils::errors::Result;

use super::AppState;

/// Submit an attendee registration against an event
pub async fn submit_registration(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(request): Json<SubmitRegistrationRequest>,
) -> Result<Json<EventRegistration>> {
    let registration = state
        .services
        .registration_service
        .submit(event_id, request)
        .await?;

    Ok(Json(registration))
}

/// List an event's registrations (organizer view)
pub async fn list_registrations(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<EventRegistration>>> {
    let registrations = state
        .services
        .registration_service
        .list_for_event(event_id)
        .await?;

    Ok(Json(registrations))
}

/// Apply an approver's status transition to one registration
pub async fn update_registration_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRegistrationStatusRequest>,
) -> Result<Json<EventRegistration>> {
    let registration = state
        .services
        .registration_service
        .update_status(id, request)
        .await?;

    Ok(Json(registration))
}
