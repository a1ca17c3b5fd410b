//! Integration tests for the email delivery gateway against a mock provider

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use TourneyHub::config::EmailConfig;
use TourneyHub::services::EmailService;
use TourneyHub::utils::errors::{EmailError, TourneyHubError};

fn email_config(api_url: &str) -> EmailConfig {
    EmailConfig {
        api_url: api_url.to_string(),
        api_key: "re_test_key".to_string(),
        from_address: "TourneyHub <events@tourneyhub.example>".to_string(),
        reply_to: None,
        timeout_seconds: 5,
    }
}

#[tokio::test]
async fn send_posts_payload_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "em_1"})))
        .expect(1)
        .mount(&server)
        .await;

    let service = EmailService::new(email_config(&server.uri())).unwrap();
    let receipt = service
        .send("a@b.com", "Hello", "<p>Hi there</p>")
        .await
        .unwrap();
    assert_eq!(receipt.id.as_deref(), Some("em_1"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["from"], "TourneyHub <events@tourneyhub.example>");
    assert_eq!(body["to"], json!(["a@b.com"]));
    assert_eq!(body["subject"], "Hello");
    assert_eq!(body["html"], "<p>Hi there</p>");
    assert!(body.get("reply_to").is_none());
}

#[tokio::test]
async fn provider_error_body_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
        .mount(&server)
        .await;

    let service = EmailService::new(email_config(&server.uri())).unwrap();
    let err = service
        .send("a@b.com", "Hello", "<p>Hi</p>")
        .await
        .unwrap_err();

    match err {
        TourneyHubError::Email(EmailError::RequestFailed(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("provider exploded"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn per_message_reply_to_overrides_configured_one() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "em_2"})))
        .mount(&server)
        .await;

    let mut config = email_config(&server.uri());
    config.reply_to = Some("support@tourneyhub.example".to_string());

    let service = EmailService::new(config).unwrap();
    service
        .send_with_reply_to(
            "a@b.com",
            "Hello",
            "<p>Hi</p>",
            Some("td@springopen.example".to_string()),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["reply_to"], "td@springopen.example");
}
