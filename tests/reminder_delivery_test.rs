//! Integration tests for the reminder fan-out against a mock provider
//!
//! The repository-facing half of the job (day-window selection) is covered
//! by its own unit tests; these tests exercise the delivery half: one call
//! per registrant, bounded concurrency, and per-item failure isolation.

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sqlx::types::Json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use TourneyHub::config::EmailConfig;
use TourneyHub::models::event::Event;
use TourneyHub::models::registration::EventRegistration;
use TourneyHub::services::reminder::{deliver_all, reminder_jobs_for};
use TourneyHub::services::EmailService;

fn email_config(api_url: &str) -> EmailConfig {
    EmailConfig {
        api_url: api_url.to_string(),
        api_key: "re_test_key".to_string(),
        from_address: "TourneyHub <events@tourneyhub.example>".to_string(),
        reply_to: None,
        timeout_seconds: 5,
    }
}

fn spring_open() -> Event {
    let start = Utc::now() + Duration::days(7);
    Event {
        id: 1,
        title: "Spring Open".to_string(),
        description: None,
        location: Some("Community Chess Hall".to_string()),
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

#[tokio::test]
async fn one_delivery_call_per_registrant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "em"})))
        .expect(3)
        .mount(&server)
        .await;

    let event = spring_open();
    let regs = vec![
        registration("a@b.com"),
        registration("c@d.com"),
        registration("e@f.com"),
    ];

    let email = EmailService::new(email_config(&server.uri())).unwrap();
    let jobs = reminder_jobs_for(&event, &regs);
    let (sent, failed) = deliver_all(&email, jobs, 4).await;

    assert_eq!(sent, 3);
    assert_eq!(failed, 0);

    // Every payload carries the event title in the subject and the
    // location in the body.
    for request in server.received_requests().await.unwrap() {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        assert!(body["subject"].as_str().unwrap().contains("Spring Open"));
        assert!(body["html"].as_str().unwrap().contains("Community Chess Hall"));
    }
}

#[tokio::test]
async fn one_failed_send_does_not_abort_the_batch() {
    let server = MockServer::start().await;

    // The middle recipient fails; the rest of the batch still goes out.
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(json!({"to": ["bad@b.com"]})))
        .respond_with(ResponseTemplate::new(500).set_body_string("mailbox on fire"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "em"})))
        .expect(2)
        .mount(&server)
        .await;

    let event = spring_open();
    let regs = vec![
        registration("a@b.com"),
        registration("bad@b.com"),
        registration("c@d.com"),
    ];

    let email = EmailService::new(email_config(&server.uri())).unwrap();
    let jobs = reminder_jobs_for(&event, &regs);
    let (sent, failed) = deliver_all(&email, jobs, 2).await;

    assert_eq!(sent, 2);
    assert_eq!(failed, 1);
}

#[tokio::test]
async fn single_registration_scenario() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "em"})))
        .expect(1)
        .mount(&server)
        .await;

    let event = spring_open();
    let regs = vec![registration("a@b.com")];

    let email = EmailService::new(email_config(&server.uri())).unwrap();
    let jobs = reminder_jobs_for(&event, &regs);
    let (sent, failed) = deliver_all(&email, jobs, 4).await;

    assert_eq!(sent, 1);
    assert_eq!(failed, 0);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["to"], json!(["a@b.com"]));
}

#[tokio::test]
async fn empty_batch_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "em"})))
        .expect(0)
        .mount(&server)
        .await;

    let event = spring_open();
    let email = EmailService::new(email_config(&server.uri())).unwrap();
    let jobs = reminder_jobs_for(&event, &[]);
    let (sent, failed) = deliver_all(&email, jobs, 4).await;

    assert_eq!(sent, 0);
    assert_eq!(failed, 0);
}
