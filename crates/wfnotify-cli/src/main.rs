//! wfnotify - Slack notifications for CI workflow runs
//!
//! Reads run metadata and templates from flags or the `INPUT_*` / `GITHUB_*`
//! environment of a GitHub Actions step, renders a Slack attachment and
//! delivers it through a webhook or the chat API.
//!
//! Exits non-zero on configuration or delivery errors.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn, Level};

use wfnotify_core::{
    build, ColorProfile, IconSet, MentionSpec, PayloadOptions, RunContext, SlackMessage,
    Templates, TriggerSet,
};
use wfnotify_delivery::{
    DeliveryConfig, DeliveryMode, GithubWorkflowResolver, Notifier, StaticWorkflowResolver,
    WorkflowUrlResolver, DEFAULT_GITHUB_API_URL,
};

const DEFAULT_NOTIFY_WHEN: &str = "success,failure,cancelled,warnings";

#[derive(Parser, Debug)]
#[command(name = "wfnotify")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Send CI workflow status notifications to Slack", long_about = None)]
#[command(args_override_self = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,

    /// Print the payload instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Skip the workflow URL lookup ({workflow_url} renders empty)
    #[arg(long)]
    offline: bool,

    // ── run outcome and templates ──────────────────────────────────────
    /// Job status (success, failure, cancelled, skipped; anything else is a warning)
    #[arg(long, env = "INPUT_STATUS")]
    status: String,

    /// Template for the notification title
    #[arg(long, env = "INPUT_NOTIFICATION_TITLE")]
    notification_title: Option<String>,

    /// Template for the message body
    #[arg(long, env = "INPUT_MESSAGE_FORMAT")]
    message_format: Option<String>,

    /// Template for the footer
    #[arg(long, env = "INPUT_FOOTER")]
    footer: Option<String>,

    /// Statuses that trigger a notification
    #[arg(long, env = "INPUT_NOTIFY_WHEN", default_value = DEFAULT_NOTIFY_WHEN)]
    notify_when: String,

    // ── mentions ────────────────────────────────────────────────────────
    /// Slack user IDs to mention
    #[arg(long, env = "INPUT_MENTION_USERS", default_value = "")]
    mention_users: String,

    /// Statuses that trigger user mentions
    #[arg(long, env = "INPUT_MENTION_USERS_WHEN", default_value = "")]
    mention_users_when: String,

    /// Slack group IDs (or `!channel`, `!here`) to mention
    #[arg(long, env = "INPUT_MENTION_GROUPS", default_value = "")]
    mention_groups: String,

    /// Statuses that trigger group mentions
    #[arg(long, env = "INPUT_MENTION_GROUPS_WHEN", default_value = "")]
    mention_groups_when: String,

    // ── icons and colors ───────────────────────────────────────────────
    #[arg(long, env = "INPUT_ICON_SUCCESS")]
    icon_success: Option<String>,

    #[arg(long, env = "INPUT_ICON_FAILURE")]
    icon_failure: Option<String>,

    #[arg(long, env = "INPUT_ICON_CANCELLED")]
    icon_cancelled: Option<String>,

    #[arg(long, env = "INPUT_ICON_WARNINGS")]
    icon_warnings: Option<String>,

    #[arg(long, env = "INPUT_ICON_SKIPPED")]
    icon_skipped: Option<String>,

    /// Color used for cancelled runs
    #[arg(
        long,
        env = "INPUT_CANCELLED_COLOR",
        value_enum,
        default_value_t = CancelledColor::Danger
    )]
    cancelled_color: CancelledColor,

    // ── run context ────────────────────────────────────────────────────
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    #[arg(long = "ref", env = "GITHUB_REF", default_value = "")]
    git_ref: String,

    #[arg(long, env = "GITHUB_SHA")]
    sha: String,

    #[arg(long, env = "GITHUB_JOB", default_value = "")]
    job: String,

    #[arg(long, env = "GITHUB_WORKFLOW", default_value = "")]
    workflow: String,

    #[arg(long, env = "GITHUB_RUN_ID", default_value = "")]
    run_id: String,

    #[arg(long, env = "GITHUB_SERVER_URL", default_value = "https://github.com")]
    server_url: String,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    api_url: String,

    /// Token for the workflow URL lookup
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Fallback for `--github-token`, normally the job's `GITHUB_TOKEN`
    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    github_env_token: Option<String>,

    // ── delivery ──────────────────────────────────────────────────────
    /// Incoming-webhook URL (webhook mode)
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: Option<String>,

    /// Bot or user token (API mode)
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true)]
    slack_token: Option<String>,

    /// Channel to post to in API mode
    #[arg(long, env = "INPUT_CHANNEL")]
    channel: Option<String>,

    /// Override the Slack API base URL
    #[arg(long, env = "SLACK_API_URL")]
    slack_api_url: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CancelledColor {
    /// Same as failures
    Danger,
    /// A separate `cancelled` color
    Distinct,
}

impl From<CancelledColor> for ColorProfile {
    fn from(value: CancelledColor) -> Self {
        match value {
            CancelledColor::Danger => ColorProfile::Classic,
            CancelledColor::Distinct => ColorProfile::DistinctCancelled,
        }
    }
}

impl Cli {
    fn run_context(&self, workflow_url: String) -> RunContext {
        RunContext {
            repository: self.repository.clone(),
            git_ref: self.git_ref.clone(),
            sha: self.sha.clone(),
            job: self.job.clone(),
            workflow: self.workflow.clone(),
            workflow_url,
            server_url: self.server_url.clone(),
            run_id: self.run_id.clone(),
        }
    }

    fn payload_options(&self) -> PayloadOptions {
        let templates = Templates::default();
        let icons = IconSet::default();

        PayloadOptions {
            templates: Templates {
                title: self.notification_title.clone().unwrap_or(templates.title),
                message: self.message_format.clone().unwrap_or(templates.message),
                footer: self.footer.clone().unwrap_or(templates.footer),
            },
            mentions: vec![
                MentionSpec::users(&self.mention_users, &self.mention_users_when),
                MentionSpec::groups(&self.mention_groups, &self.mention_groups_when),
            ],
            icons: IconSet {
                success: self.icon_success.clone().unwrap_or(icons.success),
                failure: self.icon_failure.clone().unwrap_or(icons.failure),
                cancelled: self.icon_cancelled.clone().unwrap_or(icons.cancelled),
                warnings: self.icon_warnings.clone().unwrap_or(icons.warnings),
                skipped: self.icon_skipped.clone().unwrap_or(icons.skipped),
            },
            color_profile: self.cancelled_color.into(),
        }
    }

    fn delivery_config(&self) -> DeliveryConfig {
        DeliveryConfig {
            webhook_url: self.webhook_url.clone(),
            token: self.slack_token.clone(),
            channel: self.channel.clone(),
            api_base_url: self.slack_api_url.clone(),
        }
    }

    /// Token for the GitHub API: `INPUT_TOKEN` first, then `GITHUB_TOKEN`.
    fn lookup_token(&self) -> Option<String> {
        [&self.github_token, &self.github_env_token]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
            .cloned()
    }

    fn workflow_resolver(&self) -> Result<Box<dyn WorkflowUrlResolver>> {
        if self.offline {
            return Ok(Box::new(StaticWorkflowResolver::default()));
        }
        let resolver = GithubWorkflowResolver::new(&self.api_url, self.lookup_token())
            .context("Failed to create GitHub client")?;
        Ok(Box::new(resolver))
    }
}

/// What a single invocation did.
#[derive(Debug)]
enum RunReport {
    /// Status not in the notify set; nothing was built or sent.
    Skipped,
    /// Payload rendered but not sent.
    DryRun(SlackMessage),
    Sent(DeliveryMode),
}

async fn run(cli: &Cli) -> Result<RunReport> {
    let notify_when = TriggerSet::parse(&cli.notify_when);
    if notify_when.is_empty() {
        warn!("notify_when lists no statuses, nothing will be sent");
    }
    if !notify_when.contains(&cli.status) {
        info!(
            status = %cli.status,
            notify_when = %cli.notify_when,
            "Status not in notify_when, skipping notification"
        );
        return Ok(RunReport::Skipped);
    }

    // Credentials are checked before any network traffic.
    let notifier = if cli.dry_run {
        None
    } else {
        Some(
            cli.delivery_config()
                .select()
                .context("Invalid Slack delivery configuration")?,
        )
    };

    let workflow_url = cli
        .workflow_resolver()?
        .resolve(&cli.repository, &cli.workflow)
        .await;
    let ctx = cli.run_context(workflow_url);
    let attachment = build(&ctx, &cli.status, &cli.payload_options());
    debug!(text = %attachment.text, "rendered notification");

    match notifier {
        None => Ok(RunReport::DryRun(SlackMessage::from(attachment))),
        Some(notifier) => {
            info!(status = %cli.status, mode = %notifier.mode(), "Sending message to Slack");
            notifier
                .send(&attachment)
                .await
                .context("Failed to send Slack notification")?;
            Ok(RunReport::Sent(notifier.mode()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    wfnotify_core::init_tracing(cli.json, level);

    match run(&cli).await? {
        RunReport::DryRun(message) => {
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
        RunReport::Sent(mode) => info!(mode = %mode, "Notification delivered"),
        RunReport::Skipped => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    // Serialises tests that modify process environment variables.
    static ENV_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

    const SHA: &str = "2fa67bb0998a39d9b697772782aa94599cfda489";

    /// Parse with every credential and list input pinned, so variables set
    /// on the machine running the tests cannot leak in. Later flags in
    /// `extra` override the pinned ones.
    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec![
            "wfnotify",
            "--offline",
            "--status",
            "failure",
            "--repository",
            "test/test",
            "--sha",
            SHA,
            "--ref",
            "refs/heads/main",
            "--job",
            "build",
            "--run-id",
            "1",
            "--workflow",
            "test-workflow",
            "--server-url",
            "https://github.com",
            "--notify-when",
            DEFAULT_NOTIFY_WHEN,
            "--mention-users",
            "",
            "--mention-users-when",
            "",
            "--mention-groups",
            "",
            "--mention-groups-when",
            "",
            "--icon-success",
            ":DONE:",
            "--icon-failure",
            ":FAIL:",
            "--cancelled-color",
            "danger",
            "--github-token",
            "",
            "--github-env-token",
            "",
            "--webhook-url",
            "",
            "--slack-token",
            "",
            "--channel",
            "",
            "--slack-api-url",
            "",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).expect("parse failed")
    }

    #[test]
    fn test_cli_requires_status() {
        let _guard = ENV_LOCK.blocking_lock();
        std::env::remove_var("INPUT_STATUS");

        let result = Cli::try_parse_from(["wfnotify", "--repository", "a/b", "--sha", "abc"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_later_flag_overrides_earlier() {
        let cli = parse(&["--status", "success"]);
        assert_eq!(cli.status, "success");
    }

    #[test]
    fn test_input_token_preferred_over_github_token() {
        let cli = parse(&["--github-token", "ghs-input", "--github-env-token", "ghs-env"]);
        assert_eq!(cli.lookup_token().as_deref(), Some("ghs-input"));

        let cli = parse(&["--github-token", " ", "--github-env-token", "ghs-env"]);
        assert_eq!(cli.lookup_token().as_deref(), Some("ghs-env"));

        assert_eq!(parse(&[]).lookup_token(), None);
    }

    #[tokio::test]
    async fn test_github_token_env_authenticates_lookup() {
        let _guard = ENV_LOCK.lock().await;
        std::env::remove_var("INPUT_TOKEN");
        std::env::set_var("GITHUB_TOKEN", "ghs-from-env");

        let server = MockServer::start_async().await;
        let lookup = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repos/test/test/actions/workflows")
                    .header("authorization", "token ghs-from-env");
                then.status(200).json_body(serde_json::json!({
                    "workflows": [
                        {
                            "name": "test-workflow",
                            "html_url": "https://github.com/test/test/ci.yml"
                        }
                    ]
                }));
            })
            .await;

        let api_url = server.base_url();
        let result = Cli::try_parse_from([
            "wfnotify",
            "--dry-run",
            "--status",
            "failure",
            "--notify-when",
            "failure",
            "--repository",
            "test/test",
            "--sha",
            SHA,
            "--workflow",
            "test-workflow",
            "--api-url",
            api_url.as_str(),
            "--message-format",
            "{workflow_url}",
            "--mention-users",
            "",
            "--mention-groups",
            "",
        ]);
        std::env::remove_var("GITHUB_TOKEN");
        let cli = result.expect("parse failed");

        assert_eq!(cli.github_token, None);
        assert_eq!(cli.lookup_token().as_deref(), Some("ghs-from-env"));

        match run(&cli).await.expect("run failed") {
            RunReport::DryRun(message) => {
                assert_eq!(
                    message.attachments[0].text,
                    "https://github.com/test/test/ci.yml"
                );
            }
            other => panic!("unexpected report: {other:?}"),
        }
        lookup.assert_hits_async(1).await;
    }

    #[test]
    fn test_payload_options_from_flags() {
        let cli = parse(&[
            "--message-format",
            "{emoji} *{workflow}* {status_message}",
            "--mention-users",
            "U0160UUNH8S,U0080UUAA9N",
            "--mention-users-when",
            "failure,warnings",
            "--mention-groups",
            "SAZ94GDB8,!channel",
            "--mention-groups-when",
            "failure,warnings",
        ]);
        let attachment = build(
            &cli.run_context(String::new()),
            &cli.status,
            &cli.payload_options(),
        );
        assert_eq!(
            attachment.text,
            ":FAIL: *test-workflow* failed\n\
             <@U0160UUNH8S> <@U0080UUAA9N>\n\
             <!subteam^SAZ94GDB8> <!channel>"
        );
    }

    #[test]
    fn test_cancelled_color_flag() {
        let cli = parse(&["--cancelled-color", "distinct"]);
        assert_eq!(
            cli.payload_options().color_profile,
            ColorProfile::DistinctCancelled
        );
    }

    #[tokio::test]
    async fn test_skipped_when_status_not_in_notify_when() {
        let cli = parse(&["--notify-when", "success"]);
        let report = run(&cli).await.expect("run failed");
        assert!(matches!(report, RunReport::Skipped));
    }

    #[tokio::test]
    async fn test_empty_notify_when_skips_every_status() {
        let cli = parse(&["--notify-when", " , "]);
        let report = run(&cli).await.expect("run failed");
        assert!(matches!(report, RunReport::Skipped));
    }

    #[tokio::test]
    async fn test_dry_run_needs_no_credentials() {
        let cli = parse(&["--dry-run", "--message-format", "{emoji} {status_message}"]);
        let report = run(&cli).await.expect("run failed");
        match report {
            RunReport::DryRun(message) => {
                assert_eq!(message.attachments.len(), 1);
                assert_eq!(message.attachments[0].text, ":FAIL: failed");
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_both_credentials_fail_before_send() {
        let cli = parse(&[
            "--webhook-url",
            "http://127.0.0.1:1/hook",
            "--slack-token",
            "xoxb-1",
            "--channel",
            "#ci",
        ]);
        let err = run(&cli).await.unwrap_err();
        assert!(format!("{err:#}").contains("configure exactly one"));
    }

    #[tokio::test]
    async fn test_webhook_delivery_end_to_end() {
        let server = MockServer::start_async().await;
        let hook = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/hook")
                    .body_contains(r#""text":":FAIL: *test-workflow* failed""#)
                    .body_contains(r#""color":"danger""#);
                then.status(200).body("ok");
            })
            .await;

        let url = server.url("/hook");
        let cli = parse(&[
            "--webhook-url",
            url.as_str(),
            "--message-format",
            "{emoji} *{workflow}* {status_message}",
        ]);
        let report = run(&cli).await.expect("run failed");

        assert!(matches!(report, RunReport::Sent(DeliveryMode::Webhook)));
        hook.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_webhook_failure_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(500).body("nope");
            })
            .await;

        let url = server.url("/hook");
        let cli = parse(&["--webhook-url", url.as_str()]);
        let err = run(&cli).await.unwrap_err();
        assert!(format!("{err:#}").contains("HTTP 500"));
    }
}
