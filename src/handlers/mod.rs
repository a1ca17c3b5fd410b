//! HTTP handlers module
//!
//! Axum route handlers and the error-to-response mapping. Authorization is
//! out of scope here: organizer/admin surfaces are exposed but ownership
//! checks belong to the caller's session layer.

pub mod email;
pub mod events;
pub mod health;
pub mod registrations;
pub mod reminders;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::database::{DatabasePool, DatabaseService};
use crate::services::ServiceFactory;
use crate::utils::errors::TourneyHubError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: DatabasePool,
    pub db: DatabaseService,
    pub services: ServiceFactory,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event).patch(events::update_event),
        )
        .route(
            "/events/{id}/registrations",
            post(registrations::submit_registration).get(registrations::list_registrations),
        )
        .route(
            "/registrations/{id}/status",
            patch(registrations::update_registration_status),
        )
        .route("/email/send", post(email::send_email))
        .route("/reminders/run", get(reminders::run_reminders))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

impl IntoResponse for TourneyHubError {
    fn into_response(self) -> Response {
        let status = match &self {
            TourneyHubError::EventNotFound { .. }
            | TourneyHubError::RegistrationNotFound { .. } => StatusCode::NOT_FOUND,
            TourneyHubError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TourneyHubError::DeadlinePassed
            | TourneyHubError::CapacityExceeded
            | TourneyHubError::RegistrationClosed(_)
            | TourneyHubError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
            TourneyHubError::InvalidInput(_) | TourneyHubError::InvalidDate(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = match &self {
            TourneyHubError::Validation(errors) => json!({
                "success": false,
                "error": self.to_string(),
                "field_errors": errors,
            }),
            _ => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
