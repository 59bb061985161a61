//! wfnotify delivery - getting rendered attachments to Slack
//!
//! Provides:
//! - `Notifier`: the send seam, with webhook and token API implementations
//! - `DeliveryConfig`: picks exactly one mode from the supplied credentials
//! - `WorkflowUrlResolver`: GitHub lookup of a workflow's page URL

pub mod api;
pub mod error;
pub mod notifier;
pub mod webhook;
pub mod workflow_url;

pub use api::{ApiNotifier, DEFAULT_API_BASE_URL};
pub use error::{DeliveryError, Result};
pub use notifier::{DeliveryConfig, DeliveryMode, Notifier};
pub use webhook::WebhookNotifier;
pub use workflow_url::{
    GithubWorkflowResolver, StaticWorkflowResolver, WorkflowUrlResolver, DEFAULT_GITHUB_API_URL,
};
