//! Liveness handler

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::database;
use crate::utils::errors::Result;

use super::AppState;

/// Liveness check including a database ping
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>> {
    database::health_check(&state.pool).await?;

    Ok(Json(json!({
        "status": "ok",
        "version": crate::VERSION,
    })))
}
