//! Direct email delivery handler

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::utils::errors::Result;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Send one email through the delivery gateway
pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<Value>> {
    state
        .services
        .email_service
        .send(&request.to, &request.subject, &request.html)
        .await?;

    Ok(Json(json!({ "success": true })))
}
