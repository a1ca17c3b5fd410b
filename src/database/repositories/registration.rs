//! Registration repository implementation
//!
//! The submission insert runs inside a transaction that locks the owning
//! event row before counting active registrations, so two submissions
//! racing the capacity boundary serialize instead of both slipping past
//! `max_registrations`.

use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::registration::{
    resolve_status, CapacityRule, EventRegistration, RegistrationStatus,
};
use crate::utils::errors::TourneyHubError;

const REGISTRATION_COLUMNS: &str = "id, event_id, status, form_data, email, first_name, last_name, created_at, approved_at, approved_by";

/// Validated submission handed to the store
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub form_data: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically check capacity and insert one registration.
    ///
    /// Locks the event row, counts rows that still hold a slot, resolves
    /// the initial status from the capacity rule, and inserts — all in one
    /// transaction. A capacity rejection rolls the transaction back.
    pub async fn create_for_event(
        &self,
        event_id: i64,
        rule: CapacityRule,
        new: NewRegistration,
    ) -> Result<EventRegistration, TourneyHubError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<(i64,)> = sqlx::query_as("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(TourneyHubError::EventNotFound { event_id });
        }

        let active: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status NOT IN ('rejected', 'cancelled')",
        )
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        let status = resolve_status(&rule, active.0)?;

        let registration = sqlx::query_as::<_, EventRegistration>(&format!(
            r#"
            INSERT INTO registrations (id, event_id, status, form_data, email, first_name, last_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(status.as_str())
        .bind(Json(new.form_data))
        .bind(new.email)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(registration)
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventRegistration>, TourneyHubError> {
        let registration = sqlx::query_as::<_, EventRegistration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// All registrations for one event, oldest first
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<EventRegistration>, TourneyHubError> {
        let registrations = sqlx::query_as::<_, EventRegistration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = $1 ORDER BY created_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Apply an approver's status transition
    pub async fn update_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
        approved_by: Option<String>,
    ) -> Result<EventRegistration, TourneyHubError> {
        let approved_at = if status == RegistrationStatus::Approved {
            Some(Utc::now())
        } else {
            None
        };

        let registration = sqlx::query_as::<_, EventRegistration>(&format!(
            r#"
            UPDATE registrations
            SET status = $2,
                approved_at = COALESCE($3, approved_at),
                approved_by = COALESCE($4, approved_by)
            WHERE id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(approved_at)
        .bind(approved_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TourneyHubError::RegistrationNotFound { registration_id: id })?;

        Ok(registration)
    }

    /// Count registrations that still hold a capacity slot
    pub async fn count_active(&self, event_id: i64) -> Result<i64, TourneyHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status NOT IN ('rejected', 'cancelled')",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
