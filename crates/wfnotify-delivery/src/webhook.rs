//! Slack incoming-webhook delivery.

use async_trait::async_trait;
use tracing::{debug, info, warn};
use wfnotify_core::{Attachment, SlackMessage};

use crate::error::{DeliveryError, Result};
use crate::notifier::{DeliveryMode, Notifier, USER_AGENT};

/// Posts `{"attachments": [...]}` to an incoming-webhook URL.
pub struct WebhookNotifier {
    webhook_url: String,
    http: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            webhook_url: webhook_url.to_string(),
            http,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Webhook
    }

    async fn send(&self, attachment: &Attachment) -> Result<()> {
        let message = SlackMessage::from(attachment.clone());
        debug!(len = attachment.text.len(), "posting to Slack webhook");

        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Slack webhook returned error");
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Sent message to Slack");
        Ok(())
    }
}
