use super::{ProviderKind, ScanError, encode_component};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static GITHUB_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com/([^/]+)/([^/]+)").unwrap());

static GITLAB_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"gitlab\.com/([^/]+(?:/[^/]+)+)").unwrap());

/// A repository located on a provider, built fresh for every call
#[derive(Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    pub kind: ProviderKind,
    /// User, organization or (GitLab) group path
    pub owner: String,
    pub name: String,
    pub branch: String,
    pub access_token: Option<String>,
}

impl RepositoryReference {
    /// `https://github.com/{owner}/{repo}[...]`, with a trailing `.git` dropped
    pub fn parse_github(
        url: &str,
        branch: &str,
        access_token: Option<&str>,
    ) -> Result<Self, ScanError> {
        let path = strip_query(url);
        let caps = GITHUB_URL
            .captures(path)
            .ok_or(ScanError::InvalidUrl(ProviderKind::GitHub))?;

        let owner = caps[1].to_string();
        let name = strip_git_suffix(&caps[2]).to_string();
        if name.is_empty() {
            return Err(ScanError::InvalidUrl(ProviderKind::GitHub));
        }

        Ok(Self::new(ProviderKind::GitHub, owner, name, branch, access_token))
    }

    /// `https://gitlab.com/{group}[/{subgroup}...]/{project}[/-/...]`
    ///
    /// Nested groups are kept: everything before the last segment is the owner.
    pub fn parse_gitlab(
        url: &str,
        branch: &str,
        access_token: Option<&str>,
    ) -> Result<Self, ScanError> {
        let path = strip_query(url);
        let path = path.split("/-/").next().unwrap_or(path);
        let caps = GITLAB_URL
            .captures(path.trim_end_matches('/'))
            .ok_or(ScanError::InvalidUrl(ProviderKind::GitLab))?;

        let full = strip_git_suffix(&caps[1]);
        let (owner, name) = full
            .rsplit_once('/')
            .filter(|(_, name)| !name.is_empty())
            .ok_or(ScanError::InvalidUrl(ProviderKind::GitLab))?;

        Ok(Self::new(
            ProviderKind::GitLab,
            owner.to_string(),
            name.to_string(),
            branch,
            access_token,
        ))
    }

    fn new(
        kind: ProviderKind,
        owner: String,
        name: String,
        branch: &str,
        access_token: Option<&str>,
    ) -> Self {
        Self {
            kind,
            owner,
            name,
            branch: branch.to_string(),
            access_token: access_token
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// GitLab project identifier: the full path, percent-encoded as one component
    pub fn project_id(&self) -> String {
        encode_component(&self.full_name())
    }
}

impl fmt::Debug for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryReference")
            .field("kind", &self.kind)
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("branch", &self.branch)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn strip_git_suffix(segment: &str) -> &str {
    segment.strip_suffix(".git").unwrap_or(segment)
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}
