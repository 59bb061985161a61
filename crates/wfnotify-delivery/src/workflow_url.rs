//! Workflow page URL lookup.
//!
//! Resolution never fails: any problem yields an empty string, which the
//! templates substitute like any other value.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::notifier::USER_AGENT;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Resolves the HTML URL of a workflow by its display name.
#[async_trait]
pub trait WorkflowUrlResolver: Send + Sync {
    /// URL for `workflow` in `repo`, or an empty string.
    async fn resolve(&self, repo: &str, workflow: &str) -> String;
}

/// Always returns the same value. Used offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticWorkflowResolver(pub String);

#[async_trait]
impl WorkflowUrlResolver for StaticWorkflowResolver {
    async fn resolve(&self, _repo: &str, _workflow: &str) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Deserialize)]
struct WorkflowList {
    #[serde(default)]
    workflows: Vec<WorkflowEntry>,
}

#[derive(Debug, Deserialize)]
struct WorkflowEntry {
    name: String,
    html_url: String,
}

/// Looks workflows up through the GitHub REST API.
pub struct GithubWorkflowResolver {
    api_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl GithubWorkflowResolver {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            http,
        })
    }

    async fn fetch(&self, repo: &str, workflow: &str) -> Result<Option<String>> {
        let url = format!("{}/repos/{}/actions/workflows", self.api_url, repo);

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let resp = request.send().await?;
        if resp.status() != reqwest::StatusCode::OK {
            warn!(status = %resp.status(), repo, "workflow lookup returned non-200");
            return Ok(None);
        }

        let list: WorkflowList = resp.json().await?;
        Ok(list
            .workflows
            .into_iter()
            .find(|w| w.name == workflow)
            .map(|w| w.html_url))
    }
}

#[async_trait]
impl WorkflowUrlResolver for GithubWorkflowResolver {
    async fn resolve(&self, repo: &str, workflow: &str) -> String {
        match self.fetch(repo, workflow).await {
            Ok(Some(url)) => {
                debug!(workflow, url = %url, "resolved workflow URL");
                url
            }
            Ok(None) => {
                debug!(workflow, "workflow not found");
                String::new()
            }
            Err(e) => {
                warn!(error = %e, workflow, "workflow lookup failed");
                String::new()
            }
        }
    }
}
