//! Notification delivery gateway
//!
//! Thin wrapper over the third-party transactional-email provider's HTTP
//! API. One send is one POST; failures surface the provider's error body.
//! There is no retry or queuing here — callers decide how to isolate
//! failures.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::EmailConfig;
use crate::utils::errors::{EmailError, Result, TourneyHubError};

/// Outgoing email payload sent to the provider
#[derive(Debug, Clone, Serialize)]
pub struct EmailPayload {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Provider acknowledgement for a delivered email
#[derive(Debug, Clone, Deserialize)]
pub struct SendReceipt {
    pub id: Option<String>,
}

/// Email delivery service
#[derive(Debug, Clone)]
pub struct EmailService {
    client: Client,
    config: EmailConfig,
}

impl EmailService {
    /// Create a new EmailService instance
    pub fn new(config: EmailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("TourneyHub/1.0")
            .build()
            .map_err(TourneyHubError::Http)?;

        Ok(Self { client, config })
    }

    /// Send one email through the provider
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<SendReceipt> {
        self.send_with_reply_to(to, subject, html, None).await
    }

    /// Send one email with a per-message reply-to overriding the configured one
    pub async fn send_with_reply_to(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        reply_to: Option<String>,
    ) -> Result<SendReceipt> {
        let payload = EmailPayload {
            from: self.config.from_address.clone(),
            to: vec![to.to_string()],
            subject: subject.to_string(),
            html: html.to_string(),
            reply_to: reply_to.or_else(|| self.config.reply_to.clone()),
        };

        self.send_payload(&payload).await
    }

    /// Send a fully-formed payload
    pub async fn send_payload(&self, payload: &EmailPayload) -> Result<SendReceipt> {
        let url = format!("{}/emails", self.config.api_url.trim_end_matches('/'));
        debug!(to = ?payload.to, subject = %payload.subject, "Sending email");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TourneyHubError::Email(EmailError::Timeout)
                } else if e.is_connect() {
                    TourneyHubError::Email(EmailError::ServiceUnavailable)
                } else {
                    TourneyHubError::Email(EmailError::RequestFailed(e.to_string()))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Email provider rejected send");
            return Err(TourneyHubError::Email(EmailError::RequestFailed(format!(
                "HTTP {status}: {error_text}"
            ))));
        }

        let receipt: SendReceipt = response
            .json()
            .await
            .map_err(|e| TourneyHubError::Email(EmailError::InvalidResponse(e.to_string())))?;

        info!(to = ?payload.to, subject = %payload.subject, "Email sent successfully");
        Ok(receipt)
    }
}
