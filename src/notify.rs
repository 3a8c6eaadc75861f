use crate::config::EmailSettings;
use crate::error::SendError;
use crate::snapshot::SnapshotFormat;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SENDGRID_BASE_URL: &str = "https://api.sendgrid.com";

/// How the snapshot travels in the email
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// File attachment with a short body
    #[default]
    Attachment,
    /// Snapshot text as the email body
    Inline,
}

/// Sends the new snapshot to whoever is watching
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, snapshot: &str) -> Result<(), SendError>;
}

#[derive(Debug, Serialize)]
struct Address {
    email: String,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<Address>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    mime: &'static str,
    value: String,
}

#[derive(Debug, Serialize)]
struct Attachment {
    content: String,
    filename: &'static str,
    #[serde(rename = "type")]
    mime: &'static str,
    disposition: &'static str,
}

/// Request body of the SendGrid v3 mail/send endpoint
#[derive(Debug, Serialize)]
struct Mail {
    personalizations: Vec<Personalization>,
    from: Address,
    subject: String,
    content: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

/// Delivers snapshots through the SendGrid HTTP API
pub struct SendGridNotifier {
    client: reqwest::Client,
    base_url: String,
    settings: EmailSettings,
    subject: String,
    delivery: Delivery,
    format: SnapshotFormat,
}

impl SendGridNotifier {
    /// Build a notifier whose API calls abort after `timeout`
    pub fn new(
        settings: EmailSettings,
        subject: &str,
        delivery: Delivery,
        format: SnapshotFormat,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: SENDGRID_BASE_URL.to_string(),
            settings,
            subject: subject.to_string(),
            delivery,
            format,
        })
    }

    /// Point the notifier at a different API host
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_mail(&self, snapshot: &str) -> Mail {
        let (body, attachments) = match self.delivery {
            Delivery::Attachment => (
                "Please find attached.".to_string(),
                vec![Attachment {
                    content: STANDARD.encode(snapshot),
                    filename: self.format.file_name(),
                    mime: self.format.mime_type(),
                    disposition: "attachment",
                }],
            ),
            Delivery::Inline => (snapshot.to_string(), Vec::new()),
        };

        Mail {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: self.settings.to.clone(),
                }],
            }],
            from: Address {
                email: self.settings.from.clone(),
            },
            subject: self.subject.clone(),
            content: vec![Content {
                mime: "text/plain",
                value: body,
            }],
            attachments,
        }
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn notify(&self, snapshot: &str) -> Result<(), SendError> {
        let mail = self.build_mail(snapshot);

        ::log::info!("sending email...");
        let url = format!("{}/v3/mail/send", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&mail)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        ::log::info!("email sent...");
        Ok(())
    }
}

/// Logs the snapshot instead of sending it
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, snapshot: &str) -> Result<(), SendError> {
        ::log::info!("Dry run, not sending email. Snapshot:\n{}", snapshot);
        Ok(())
    }
}
