//! Slack mention markup for users and user groups.

use crate::list::{parse_list, TriggerSet};

/// Which kind of identifiers a mention list holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionCategory {
    Users,
    Groups,
}

impl MentionCategory {
    /// Render a single token as Slack mention markup.
    pub fn render_token(&self, token: &str) -> String {
        match self {
            MentionCategory::Users => format!("<@{token}>"),
            // `!channel`, `!here` and friends are already complete directives
            MentionCategory::Groups if token.starts_with('!') => format!("<{token}>"),
            MentionCategory::Groups => format!("<!subteam^{token}>"),
        }
    }
}

/// Mention tokens for one category plus the statuses that trigger them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionSpec {
    pub category: MentionCategory,
    pub tokens: Vec<String>,
    pub when: TriggerSet,
}

impl MentionSpec {
    /// Build from the raw comma-delimited inputs.
    pub fn parse(category: MentionCategory, tokens: &str, when: &str) -> Self {
        Self {
            category,
            tokens: parse_list(tokens),
            when: TriggerSet::parse(when),
        }
    }

    pub fn users(tokens: &str, when: &str) -> Self {
        Self::parse(MentionCategory::Users, tokens, when)
    }

    pub fn groups(tokens: &str, when: &str) -> Self {
        Self::parse(MentionCategory::Groups, tokens, when)
    }

    /// Mention text for `status`, or an empty string when nothing applies.
    pub fn render(&self, status: &str) -> String {
        render_mentions(self.category, &self.tokens, &self.when, status)
    }
}

/// Render `tokens` as space-separated mentions if `status` is in `when`.
pub fn render_mentions(
    category: MentionCategory,
    tokens: &[String],
    when: &TriggerSet,
    status: &str,
) -> String {
    if tokens.is_empty() || !when.contains(status) {
        return String::new();
    }

    tokens
        .iter()
        .map(|token| category.render_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}
