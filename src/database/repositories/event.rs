//! Event repository implementation

use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::event::{CreateEventRequest, Event, EventCursor, EventPage, EventStatus, UpdateEventRequest};
use crate::utils::datetime;
use crate::utils::errors::TourneyHubError;

const EVENT_COLUMNS: &str = "id, title, description, location, image_url, price_cents, start_date, end_date, status, organizer_id, organizer_email, registration_config, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event; the store assigns id and timestamps
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, TourneyHubError> {
        let status = match request.status.as_deref() {
            Some(s) => EventStatus::parse(s)?,
            None => EventStatus::Draft,
        };

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, location, image_url, price_cents, start_date, end_date, status, organizer_id, organizer_email, registration_config, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.title)
        .bind(request.description)
        .bind(request.location)
        .bind(request.image_url)
        .bind(request.price_cents)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(status.as_str())
        .bind(request.organizer_id)
        .bind(request.organizer_email)
        .bind(request.registration_config.map(Json))
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, TourneyHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, TourneyHubError> {
        if let Some(status) = request.status.as_deref() {
            EventStatus::parse(status)?;
        }

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                image_url = COALESCE($5, image_url),
                price_cents = COALESCE($6, price_cents),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                status = COALESCE($9, status),
                registration_config = COALESCE($10, registration_config),
                updated_at = $11
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.location)
        .bind(request.image_url)
        .bind(request.price_cents)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.status)
        .bind(request.registration_config.map(Json))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TourneyHubError::EventNotFound { event_id: id })?;

        Ok(event)
    }

    /// Set event lifecycle status
    pub async fn set_status(&self, id: i64, status: EventStatus) -> Result<Event, TourneyHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TourneyHubError::EventNotFound { event_id: id })?;

        Ok(event)
    }

    /// Delete event; registrations cascade with it
    pub async fn delete(&self, id: i64) -> Result<(), TourneyHubError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List upcoming published events with keyset pagination.
    ///
    /// The cursor is the (start_date, id) of the last row of the previous
    /// page, so the listing stays stable under concurrent inserts at the
    /// tail. One extra row is fetched to decide whether a next page exists.
    pub async fn list_upcoming(
        &self,
        limit: i64,
        after: Option<EventCursor>,
    ) -> Result<EventPage, TourneyHubError> {
        let fetch = limit + 1;

        let mut events = match after {
            Some(cursor) => {
                sqlx::query_as::<_, Event>(&format!(
                    r#"
                    SELECT {EVENT_COLUMNS} FROM events
                    WHERE status = 'published' AND start_date > NOW()
                      AND (start_date, id) > ($2, $3)
                    ORDER BY start_date ASC, id ASC
                    LIMIT $1
                    "#
                ))
                .bind(fetch)
                .bind(cursor.start_date)
                .bind(cursor.id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Event>(&format!(
                    r#"
                    SELECT {EVENT_COLUMNS} FROM events
                    WHERE status = 'published' AND start_date > NOW()
                    ORDER BY start_date ASC, id ASC
                    LIMIT $1
                    "#
                ))
                .bind(fetch)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let next_cursor = if events.len() as i64 > limit {
            events.truncate(limit as usize);
            events.last().map(|e| EventCursor::from_event(e).encode())
        } else {
            None
        };

        Ok(EventPage { events, next_cursor })
    }

    /// Published events starting on the given UTC calendar day
    pub async fn find_starting_on(&self, day: NaiveDate) -> Result<Vec<Event>, TourneyHubError> {
        let (day_start, day_end) = datetime::day_bounds(day);

        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE status = 'published' AND start_date >= $1 AND start_date < $2
            ORDER BY start_date ASC, id ASC
            "#
        ))
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, TourneyHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
