use std::time::Duration;

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_GITLAB_API: &str = "https://gitlab.com/api/v4";
pub const DEFAULT_USER_AGENT: &str = "CyberChari-Audit-Platform";
pub const DEFAULT_BRANCH: &str = "main";

/// Settings shared by both provider clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// GitHub REST API root, without trailing slash
    pub github_api: String,
    /// GitLab REST API root (including `/api/v4`), without trailing slash
    pub gitlab_api: String,
    /// Sent as `User-Agent` on GitHub requests
    pub user_agent: String,
    /// Branch used when the caller does not name one
    pub default_branch: String,
    /// Per-request timeout; `None` keeps reqwest's default
    pub timeout: Option<Duration>,
}

impl ScannerConfig {
    pub fn new() -> Self {
        Self {
            github_api: DEFAULT_GITHUB_API.to_string(),
            gitlab_api: DEFAULT_GITLAB_API.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            timeout: None,
        }
    }

    pub fn with_github_api(mut self, base: impl Into<String>) -> Self {
        self.github_api = trim_base(base.into());
        self
    }

    pub fn with_gitlab_api(mut self, base: impl Into<String>) -> Self {
        self.gitlab_api = trim_base(base.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}
