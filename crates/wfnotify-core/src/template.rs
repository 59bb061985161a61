//! `{placeholder}` substitution.

use std::collections::BTreeMap;

/// Resolved placeholder values for one invocation.
///
/// Keys are bare names (`repo`, `commit_sha`, ...); the braces are added at
/// substitution time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMapping {
    values: BTreeMap<String, String>,
}

impl VariableMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Replace every `{key}` in `template` with its value from `vars`.
///
/// The template is scanned once, so substituted text is never re-scanned for
/// further placeholders. Unknown placeholders and stray braces pass through
/// verbatim.
pub fn render(template: &str, vars: &VariableMapping) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let resolved = after
            .find('}')
            .and_then(|close| vars.get(&after[..close]).map(|value| (close, value)));

        match resolved {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
