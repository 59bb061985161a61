//! Delivery mode selection and the `Notifier` seam.

use async_trait::async_trait;
use tracing::debug;
use wfnotify_core::Attachment;

use crate::api::ApiNotifier;
use crate::error::{DeliveryError, Result};
use crate::webhook::WebhookNotifier;

pub(crate) const USER_AGENT: &str = concat!("wfnotify/", env!("CARGO_PKG_VERSION"));

/// How a message reaches Slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// POST to an incoming-webhook URL.
    Webhook,
    /// Token-authenticated `chat.postMessage` call.
    Api,
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Webhook => f.write_str("webhook"),
            DeliveryMode::Api => f.write_str("api"),
        }
    }
}

/// Sends a rendered attachment somewhere.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn mode(&self) -> DeliveryMode;

    /// Deliver `attachment`. Exactly one attempt is made.
    async fn send(&self, attachment: &Attachment) -> Result<()>;
}

/// Raw credential inputs, blank strings counting as absent.
#[derive(Debug, Clone, Default)]
pub struct DeliveryConfig {
    pub webhook_url: Option<String>,
    pub token: Option<String>,
    pub channel: Option<String>,
    /// Override for the chat API base URL.
    pub api_base_url: Option<String>,
}

impl DeliveryConfig {
    /// Decide which mode the credentials describe.
    pub fn mode(&self) -> Result<DeliveryMode> {
        match (present(&self.webhook_url), present(&self.token)) {
            (Some(_), Some(_)) => Err(DeliveryError::BothCredentials),
            (None, None) => Err(DeliveryError::NoCredentials),
            (Some(_), None) => Ok(DeliveryMode::Webhook),
            (None, Some(_)) => Ok(DeliveryMode::Api),
        }
    }

    /// Build the notifier for the configured mode.
    pub fn select(&self) -> Result<Box<dyn Notifier>> {
        let mode = self.mode()?;
        debug!(mode = %mode, "selected delivery mode");

        match mode {
            DeliveryMode::Webhook => {
                let url = present(&self.webhook_url).ok_or(DeliveryError::NoCredentials)?;
                Ok(Box::new(WebhookNotifier::new(url)?))
            }
            DeliveryMode::Api => {
                let token = present(&self.token).ok_or(DeliveryError::NoCredentials)?;
                let channel = present(&self.channel).ok_or(DeliveryError::MissingChannel)?;
                let mut notifier = ApiNotifier::new(token, channel)?;
                if let Some(base) = present(&self.api_base_url) {
                    notifier = notifier.with_base_url(base);
                }
                Ok(Box::new(notifier))
            }
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
