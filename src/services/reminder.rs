//! Reminder scheduler job
//!
//! Stateless procedure invoked by an external time-based trigger. It finds
//! published events starting exactly `days_ahead` calendar days from now,
//! fans one reminder email out to every registrant, and reports how many
//! sends succeeded and failed.
//!
//! The fan-out is a bounded-concurrency pool with per-item failure
//! isolation: one failed send never aborts the batch. The run as a whole
//! fails only when the event collection cannot be loaded.
//!
//! The job keeps no cursor and no dedup state across runs. Its trigger
//! contract is at most one invocation per calendar day; a second run on
//! the qualifying day re-sends every reminder.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::RemindersConfig;
use crate::database::{EventRepository, RegistrationRepository};
use crate::models::event::Event;
use crate::models::registration::EventRegistration;
use crate::services::email::EmailService;
use crate::utils::datetime;
use crate::utils::errors::Result;

/// One reminder email ready for delivery
#[derive(Debug, Clone)]
pub struct ReminderJob {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outcome of a single reminder run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReminderReport {
    pub events_checked: usize,
    pub reminders_sent: usize,
    pub reminders_failed: usize,
}

/// Reminder scheduler service
#[derive(Debug, Clone)]
pub struct ReminderService {
    events: EventRepository,
    registrations: RegistrationRepository,
    email: EmailService,
    config: RemindersConfig,
}

impl ReminderService {
    pub fn new(
        events: EventRepository,
        registrations: RegistrationRepository,
        email: EmailService,
        config: RemindersConfig,
    ) -> Self {
        Self {
            events,
            registrations,
            email,
            config,
        }
    }

    /// Execute one reminder run
    pub async fn run(&self) -> Result<ReminderReport> {
        let target = target_day(Utc::now(), self.config.days_ahead);
        info!(target_day = %target, "Starting reminder run");

        let events = self.events.find_starting_on(target).await?;
        if events.is_empty() {
            info!(target_day = %target, "No events start on the target day");
            return Ok(ReminderReport::default());
        }

        let mut jobs = Vec::new();
        for event in &events {
            let registrations = self.registrations.list_for_event(event.id).await?;
            let event_jobs = reminder_jobs_for(event, &registrations);
            info!(
                event_id = event.id,
                title = %event.title,
                recipients = event_jobs.len(),
                "Event due for reminders"
            );
            jobs.extend(event_jobs);
        }

        let (sent, failed) =
            deliver_all(&self.email, jobs, self.config.max_concurrent_sends).await;

        let report = ReminderReport {
            events_checked: events.len(),
            reminders_sent: sent,
            reminders_failed: failed,
        };
        info!(
            events_checked = report.events_checked,
            reminders_sent = report.reminders_sent,
            reminders_failed = report.reminders_failed,
            "Reminder run completed"
        );

        Ok(report)
    }
}

/// The calendar day `days_ahead` days after `now`, in UTC
pub fn target_day(now: DateTime<Utc>, days_ahead: i64) -> NaiveDate {
    (now + Duration::days(days_ahead)).date_naive()
}

/// Build one reminder job per registration holding a nonblank email
pub fn reminder_jobs_for(event: &Event, registrations: &[EventRegistration]) -> Vec<ReminderJob> {
    registrations
        .iter()
        .filter(|r| !r.email.trim().is_empty())
        .map(|r| {
            let (subject, html) = build_reminder_email(event, r);
            ReminderJob {
                to: r.email.clone(),
                subject,
                html,
            }
        })
        .collect()
}

/// Build the reminder subject and HTML body for one registrant
pub fn build_reminder_email(event: &Event, registration: &EventRegistration) -> (String, String) {
    let subject = format!("Reminder: {} is one week away", event.title);

    let organizer_line = match &event.organizer_email {
        Some(email) => format!("<p>Questions? Contact the organizer at {email}.</p>"),
        None => String::new(),
    };

    let html = format!(
        "<h2>{title}</h2>\
         <p>Hi {first_name},</p>\
         <p>This is a reminder that <strong>{title}</strong> starts in one week.</p>\
         <p><strong>When:</strong> {when}<br>\
         <strong>Where:</strong> {location}</p>\
         {organizer_line}",
        title = event.title,
        first_name = registration.first_name,
        when = datetime::format_long(&event.start_date),
        location = event.location.as_deref().unwrap_or("To be announced"),
        organizer_line = organizer_line,
    );

    (subject, html)
}

/// Deliver a batch of reminder jobs with bounded concurrency.
///
/// Returns `(sent, failed)`. Each job's failure is isolated: it is logged
/// and counted without affecting the rest of the batch.
pub async fn deliver_all(
    email: &EmailService,
    jobs: Vec<ReminderJob>,
    max_concurrent: usize,
) -> (usize, usize) {
    let results = stream::iter(jobs)
        .map(|job| async move {
            match email.send(&job.to, &job.subject, &job.html).await {
                Ok(_) => true,
                Err(e) => {
                    warn!(to = %job.to, error = %e, "Reminder send failed");
                    false
                }
            }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect::<Vec<bool>>()
        .await;

    let sent = results.iter().filter(|ok| **ok).count();
    (sent, results.len() - sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn event(start: DateTime<Utc>) -> Event {
        Event {
            id: 1,
            title: "Spring Open".to_string(),
            description: None,
            location: Some("Mechanics' Institute, San Francisco".to_string()),
            image_url: None,
            price_cents: Some(4500),
            start_date: start,
            end_date: None,
            status: "published".to_string(),
            organizer_id: None,
            organizer_email: Some("td@springopen.example".to_string()),
            registration_config: None,
            created_at: start,
            updated_at: start,
        }
    }

    fn registration(email: &str) -> EventRegistration {
        EventRegistration {
            id: Uuid::new_v4(),
            event_id: 1,
            status: "approved".to_string(),
            form_data: Json(serde_json::Map::new()),
            email: email.to_string(),
            first_name: "Alba".to_string(),
            last_name: "Ruiz".to_string(),
            created_at: Utc::now(),
            approved_at: None,
            approved_by: None,
        }
    }

    #[test]
    fn test_target_day_is_exactly_seven_days_out() {
        let now = Utc.with_ymd_and_hms(2025, 4, 24, 15, 30, 0).unwrap();
        let target = target_day(now, 7);
        assert_eq!(target, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());

        // Events 6 or 8 days out fall outside the target day's bounds.
        let (start, end) = datetime::day_bounds(target);
        let six_days = now + Duration::days(6);
        let seven_days = now + Duration::days(7);
        let eight_days = now + Duration::days(8);
        assert!(six_days < start);
        assert!(seven_days >= start && seven_days < end);
        assert!(eight_days >= end);
    }

    #[test]
    fn test_reminder_email_contains_title_and_location() {
        let start = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        let e = event(start);
        let r = registration("a@b.com");
        let (subject, html) = build_reminder_email(&e, &r);

        assert!(subject.contains("Spring Open"));
        assert!(html.contains("Mechanics' Institute, San Francisco"));
        assert!(html.contains("td@springopen.example"));
        assert!(html.contains("Alba"));
    }

    #[test]
    fn test_blank_emails_are_skipped() {
        let e = event(Utc::now());
        let regs = vec![registration("a@b.com"), registration("  "), registration("")];
        let jobs = reminder_jobs_for(&e, &regs);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].to, "a@b.com");
    }

    #[test]
    fn test_event_without_registrations_produces_no_jobs() {
        let e = event(Utc::now());
        assert!(reminder_jobs_for(&e, &[]).is_empty());
    }
}
