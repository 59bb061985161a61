//! Token-authenticated delivery through Slack's `chat.postMessage`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wfnotify_core::Attachment;

use crate::error::{DeliveryError, Result};
use crate::notifier::{DeliveryMode, Notifier, USER_AGENT};

pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    attachments: [&'a Attachment; 1],
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts attachments to a channel with a bot or user token.
pub struct ApiNotifier {
    token: String,
    channel: String,
    base_url: String,
    http: reqwest::Client,
}

impl ApiNotifier {
    pub fn new(token: &str, channel: &str) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            token: token.to_string(),
            channel: channel.to_string(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            http,
        })
    }

    /// Point at a different API host (Slack-compatible servers, tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    fn endpoint(&self) -> String {
        format!("{}/chat.postMessage", self.base_url)
    }
}

#[async_trait]
impl Notifier for ApiNotifier {
    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Api
    }

    async fn send(&self, attachment: &Attachment) -> Result<()> {
        let request = PostMessageRequest {
            channel: &self.channel,
            attachments: [attachment],
        };
        debug!(channel = %self.channel, "calling chat.postMessage");

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Slack API returned error status");
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: PostMessageResponse = resp.json().await?;
        if !body.ok {
            let error = body.error.unwrap_or_else(|| "unknown_error".to_string());
            warn!(channel = %self.channel, error = %error, "chat.postMessage failed");
            return Err(DeliveryError::Api(error));
        }

        info!(channel = %self.channel, "Sent message to Slack");
        Ok(())
    }
}
