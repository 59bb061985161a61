//! Slack attachment assembly.
//!
//! [`build`] is the single entry point: it resolves the full
//! [`VariableMapping`] from the run context, renders the three templates and
//! appends mention lines. It performs no I/O and cannot fail.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::RunContext;
use crate::mention::MentionSpec;
use crate::status::{Color, ColorProfile, IconSet, RunOutcome};
use crate::template::{render, VariableMapping};

/// Attachment field Slack should parse as mrkdwn.
pub const MARKDOWN_FIELD: &str = "text";

/// Title, message and footer templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub title: String,
    pub message: String,
    pub footer: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            title: "{workflow} has {status_message}".to_string(),
            message: "{emoji} *{workflow}* {status_message} in <{repo_url}|{repo}>".to_string(),
            footer: "<{run_url}|View Run> | Linked Repo <{repo_url}|{repo}>".to_string(),
        }
    }
}

/// Rendered notification payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub text: String,
    pub fallback: String,
    pub pretext: String,
    pub color: Color,
    pub mrkdwn_in: Vec<String>,
    pub footer: String,
}

/// Message body carrying one or more attachments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlackMessage {
    pub attachments: Vec<Attachment>,
}

impl From<Attachment> for SlackMessage {
    fn from(attachment: Attachment) -> Self {
        Self {
            attachments: vec![attachment],
        }
    }
}

/// Everything [`build`] needs besides the run context.
#[derive(Debug, Clone, Default)]
pub struct PayloadOptions {
    pub templates: Templates,
    pub mentions: Vec<MentionSpec>,
    pub icons: IconSet,
    pub color_profile: ColorProfile,
}

/// Resolve every placeholder value for `status`.
pub fn variables(
    ctx: &RunContext,
    status: &str,
    icons: &IconSet,
    profile: ColorProfile,
) -> VariableMapping {
    let outcome = RunOutcome::parse(status);

    VariableMapping::new()
        .with("repo", ctx.repository.as_str())
        .with("branch", ctx.branch())
        .with("branch_url", ctx.branch_url())
        .with("commit_sha", ctx.short_sha())
        .with("commit_url", ctx.commit_url())
        .with("repo_url", ctx.repo_url())
        .with("run_url", ctx.run_url())
        .with("job", ctx.job.as_str())
        .with("workflow", ctx.workflow.as_str())
        .with("workflow_url", ctx.workflow_url.as_str())
        .with("color", outcome.color(profile).as_str())
        .with("status_message", outcome.phrase())
        .with("emoji", outcome.icon(icons))
}

/// Render the attachment for `status`.
pub fn build(ctx: &RunContext, status: &str, options: &PayloadOptions) -> Attachment {
    let vars = variables(ctx, status, &options.icons, options.color_profile);

    let title = render(&options.templates.title, &vars);
    let body = render(&options.templates.message, &vars);
    let footer = render(&options.templates.footer, &vars);

    let mut lines = vec![body];
    lines.extend(options.mentions.iter().map(|m| m.render(status)));
    let text = lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let outcome = RunOutcome::parse(status);
    let color = outcome.color(options.color_profile);
    debug!(status, outcome = outcome.as_str(), color = %color, "built attachment");

    Attachment {
        text,
        fallback: title.clone(),
        pretext: title,
        color,
        mrkdwn_in: vec![MARKDOWN_FIELD.to_string()],
        footer,
    }
}
