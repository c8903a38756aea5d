//! Mailer: renders the incident notification email and sends it through a
//! SendGrid-style HTTP mail API rather than speaking SMTP directly.

mod error;
mod templates;

pub use error::Error;
pub use templates::{render_html_body, render_plain_text_body, SUBJECT};

use async_trait::async_trait;
use sentinel_core::domain::HealthStatus;
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct EmailData {
    pub to: String,
    pub website_url: String,
    pub status: HealthStatus,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &EmailData) -> Result<()>;
}

#[derive(Serialize)]
struct SendGridPersonalization {
    to: Vec<SendGridAddress>,
}

#[derive(Serialize)]
struct SendGridAddress {
    email: String,
}

#[derive(Serialize)]
struct SendGridContent {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

#[derive(Serialize)]
struct SendGridMessage {
    personalizations: Vec<SendGridPersonalization>,
    from: SendGridAddress,
    subject: String,
    content: Vec<SendGridContent>,
}

pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    from_address: String,
    api_base: String,
}

impl SendGridMailer {
    pub fn new(api_key: String, from_address: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from_address,
            api_base: "https://api.sendgrid.com/v3/mail/send".to_string(),
        }
    }

    /// Overrides the API base URL; used by tests to point at a `wiremock`
    /// server instead of the real SendGrid endpoint.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, email: &EmailData) -> Result<()> {
        let year = chrono::Utc::now().format("%Y").to_string().parse().unwrap_or(2026);
        let message = SendGridMessage {
            personalizations: vec![SendGridPersonalization {
                to: vec![SendGridAddress {
                    email: email.to.clone(),
                }],
            }],
            from: SendGridAddress {
                email: self.from_address.clone(),
            },
            subject: SUBJECT.to_string(),
            content: vec![
                SendGridContent {
                    content_type: "text/plain".to_string(),
                    value: render_plain_text_body(&email.website_url, email.status, year),
                },
                SendGridContent {
                    content_type: "text/html".to_string(),
                    value: render_html_body(&email.website_url, email.status, year),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_base)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::ProviderStatus(response.status().as_u16()));
        }
        Ok(())
    }
}
