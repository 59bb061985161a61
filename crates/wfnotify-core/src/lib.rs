//! wfnotify core - Slack payload rendering for CI workflow runs
//!
//! Maps a run context, a status and user templates to a Slack attachment:
//! - `status`: outcome to color, phrase and icon
//! - `list`: comma-delimited inputs and trigger sets
//! - `mention`: user and group mention markup
//! - `template`: `{placeholder}` substitution
//! - `payload`: attachment assembly
//!
//! Nothing in this crate performs I/O; delivery lives in `wfnotify-delivery`.

pub mod context;
pub mod list;
pub mod mention;
pub mod payload;
pub mod status;
pub mod telemetry;
pub mod template;

pub use context::RunContext;
pub use list::{parse_list, TriggerSet};
pub use mention::{render_mentions, MentionCategory, MentionSpec};
pub use payload::{build, variables, Attachment, PayloadOptions, SlackMessage, Templates};
pub use status::{color_for, icon_for, phrase_for, Color, ColorProfile, IconSet, RunOutcome};
pub use telemetry::init_tracing;
pub use template::{render, VariableMapping};
