//! Run outcome classification: color, phrase and icon per outcome.
//!
//! Every function here is total. Values outside the known outcome set fall
//! through to the warning branch instead of failing.

use serde::{Deserialize, Serialize};

/// Terminal status of a monitored workflow job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    Success,
    Failure,
    Cancelled,
    Skipped,
    /// Catch-all for any status the classifier does not recognize.
    Warning,
}

impl RunOutcome {
    /// Classify a raw status string. Unknown values map to `Warning`.
    pub fn parse(status: &str) -> Self {
        match status {
            "success" => RunOutcome::Success,
            "failure" => RunOutcome::Failure,
            "cancelled" => RunOutcome::Cancelled,
            "skipped" => RunOutcome::Skipped,
            _ => RunOutcome::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Success => "success",
            RunOutcome::Failure => "failure",
            RunOutcome::Cancelled => "cancelled",
            RunOutcome::Skipped => "skipped",
            RunOutcome::Warning => "warning",
        }
    }

    /// Human-readable phrase used for `{status_message}`.
    pub fn phrase(&self) -> &'static str {
        match self {
            RunOutcome::Success => "passed",
            RunOutcome::Failure => "failed",
            RunOutcome::Cancelled => "cancelled",
            RunOutcome::Skipped => "skipped",
            RunOutcome::Warning => "passed with warnings",
        }
    }

    /// Attachment color for this outcome under the given dialect.
    pub fn color(&self, profile: ColorProfile) -> Color {
        match self {
            RunOutcome::Success => Color::Good,
            RunOutcome::Failure => Color::Danger,
            RunOutcome::Cancelled => match profile {
                ColorProfile::Classic => Color::Danger,
                ColorProfile::DistinctCancelled => Color::Cancelled,
            },
            RunOutcome::Skipped => Color::Muted,
            RunOutcome::Warning => Color::Warning,
        }
    }

    /// Icon configured for this outcome.
    pub fn icon<'a>(&self, icons: &'a IconSet) -> &'a str {
        match self {
            RunOutcome::Success => &icons.success,
            RunOutcome::Failure => &icons.failure,
            RunOutcome::Cancelled => &icons.cancelled,
            RunOutcome::Skipped => &icons.skipped,
            RunOutcome::Warning => &icons.warnings,
        }
    }
}

/// Attachment side-bar color. The wire value is one of a fixed set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Color {
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "danger")]
    Danger,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "cancelled")]
    Cancelled,
    #[serde(rename = "#808080")]
    Muted,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Good => "good",
            Color::Danger => "danger",
            Color::Warning => "warning",
            Color::Cancelled => "cancelled",
            Color::Muted => "#808080",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which color a cancelled run gets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorProfile {
    /// Cancelled renders like a failure (`danger`).
    #[default]
    Classic,
    /// Cancelled renders as its own `cancelled` color.
    DistinctCancelled,
}

/// Per-outcome icon strings substituted for `{emoji}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    pub success: String,
    pub failure: String,
    pub cancelled: String,
    pub warnings: String,
    pub skipped: String,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            success: ":heavy_check_mark:".to_string(),
            failure: ":x:".to_string(),
            cancelled: ":no_entry_sign:".to_string(),
            warnings: ":large_orange_diamond:".to_string(),
            skipped: ":fast_forward:".to_string(),
        }
    }
}

/// Color for a raw status string.
pub fn color_for(status: &str, profile: ColorProfile) -> Color {
    RunOutcome::parse(status).color(profile)
}

/// Phrase for a raw status string.
pub fn phrase_for(status: &str) -> &'static str {
    RunOutcome::parse(status).phrase()
}

/// Icon for a raw status string.
pub fn icon_for<'a>(status: &str, icons: &'a IconSet) -> &'a str {
    RunOutcome::parse(status).icon(icons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_outcomes_parse() {
        assert_eq!(RunOutcome::parse("success"), RunOutcome::Success);
        assert_eq!(RunOutcome::parse("failure"), RunOutcome::Failure);
        assert_eq!(RunOutcome::parse("cancelled"), RunOutcome::Cancelled);
        assert_eq!(RunOutcome::parse("skipped"), RunOutcome::Skipped);
    }

    #[test]
    fn test_unknown_outcomes_fall_back_to_warning() {
        for status in ["warning", "warnings", "", "SUCCESS", "timed_out", "neutral"] {
            assert_eq!(RunOutcome::parse(status), RunOutcome::Warning, "{status}");
            assert_eq!(color_for(status, ColorProfile::Classic), Color::Warning);
            assert_eq!(phrase_for(status), "passed with warnings");
        }
    }

    #[test]
    fn test_colors() {
        let p = ColorProfile::Classic;
        assert_eq!(color_for("success", p), Color::Good);
        assert_eq!(color_for("failure", p), Color::Danger);
        assert_eq!(color_for("cancelled", p), Color::Danger);
        assert_eq!(color_for("skipped", p), Color::Muted);
    }

    #[test]
    fn test_distinct_cancelled_profile() {
        assert_eq!(
            color_for("cancelled", ColorProfile::DistinctCancelled),
            Color::Cancelled
        );
        assert_eq!(
            color_for("failure", ColorProfile::DistinctCancelled),
            Color::Danger
        );
    }

    #[test]
    fn test_phrases() {
        assert_eq!(phrase_for("success"), "passed");
        assert_eq!(phrase_for("failure"), "failed");
        assert_eq!(phrase_for("cancelled"), "cancelled");
        assert_eq!(phrase_for("skipped"), "skipped");
    }

    #[test]
    fn test_icons() {
        let icons = IconSet {
            success: "S".to_string(),
            failure: "F".to_string(),
            cancelled: "C".to_string(),
            warnings: "W".to_string(),
            skipped: "K".to_string(),
        };
        assert_eq!(icon_for("success", &icons), "S");
        assert_eq!(icon_for("failure", &icons), "F");
        assert_eq!(icon_for("cancelled", &icons), "C");
        assert_eq!(icon_for("skipped", &icons), "K");
        assert_eq!(icon_for("whatever", &icons), "W");
    }

    #[test]
    fn test_color_wire_values() {
        assert_eq!(serde_json::to_string(&Color::Good).unwrap(), "\"good\"");
        assert_eq!(serde_json::to_string(&Color::Muted).unwrap(), "\"#808080\"");
        assert_eq!(Color::Cancelled.to_string(), "cancelled");
    }
}
