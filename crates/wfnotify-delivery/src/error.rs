//! Error types for delivery operations

use thiserror::Error;

/// Errors raised while selecting a delivery mode or sending a message.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Both a webhook URL and an API token were supplied
    #[error("both SLACK_WEBHOOK_URL and SLACK_TOKEN are set; configure exactly one")]
    BothCredentials,

    /// Neither a webhook URL nor an API token was supplied
    #[error("no Slack credentials provided; set SLACK_WEBHOOK_URL or SLACK_TOKEN")]
    NoCredentials,

    /// Token mode needs a target channel
    #[error("SLACK_TOKEN is set but no channel was given")]
    MissingChannel,

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-2xx response
    #[error("Slack responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The chat API answered `ok: false`
    #[error("Slack API error: {0}")]
    Api(String),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Http(err.to_string())
    }
}

/// Result type for delivery operations
pub type Result<T> = std::result::Result<T, DeliveryError>;
