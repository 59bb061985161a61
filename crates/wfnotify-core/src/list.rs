//! Comma-delimited list parsing for configuration inputs.

/// Split `raw` on commas, trim each element and drop the ones left empty.
///
/// Order is preserved. Blank input yields an empty list.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// A set of raw status values that activates a conditional rendering.
///
/// Membership is an exact element match against the parsed list, never a
/// substring test against the raw string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerSet {
    statuses: Vec<String>,
}

impl TriggerSet {
    pub fn parse(raw: &str) -> Self {
        Self {
            statuses: parse_list(raw),
        }
    }

    pub fn contains(&self, status: &str) -> bool {
        self.statuses.iter().any(|s| s == status)
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
