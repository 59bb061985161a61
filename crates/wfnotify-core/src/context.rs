//! Workflow run metadata and the URLs derived from it.

const SHORT_SHA_LEN: usize = 7;
const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Read-only metadata about the workflow run being reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    /// `owner/name` repository identifier.
    pub repository: String,

    /// Git ref that triggered the run (`refs/heads/main` or a bare name).
    pub git_ref: String,

    /// Full commit SHA.
    pub sha: String,

    pub job: String,

    pub workflow: String,

    /// Workflow page URL, resolved externally. May be empty.
    pub workflow_url: String,

    /// Base URL of the code host, e.g. `https://github.com`.
    pub server_url: String,

    pub run_id: String,
}

impl RunContext {
    /// First seven characters of the commit SHA.
    pub fn short_sha(&self) -> &str {
        match self.sha.char_indices().nth(SHORT_SHA_LEN) {
            Some((idx, _)) => &self.sha[..idx],
            None => &self.sha,
        }
    }

    /// Branch name with any `refs/heads/` prefix removed.
    pub fn branch(&self) -> &str {
        self.git_ref
            .strip_prefix(BRANCH_REF_PREFIX)
            .unwrap_or(&self.git_ref)
    }

    pub fn repo_url(&self) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), self.repository)
    }

    pub fn commit_url(&self) -> String {
        format!("{}/commit/{}", self.repo_url(), self.sha)
    }

    pub fn run_url(&self) -> String {
        format!("{}/actions/runs/{}", self.repo_url(), self.run_id)
    }

    pub fn branch_url(&self) -> String {
        format!("{}/tree/{}", self.repo_url(), self.branch())
    }
}
