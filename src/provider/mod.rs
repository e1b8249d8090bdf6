mod error;
mod github;
mod gitlab;
mod http;
mod reference;
mod registry;

#[cfg(test)]
mod tests;

pub use error::ScanError;
pub use github::GitHubClient;
pub use gitlab::GitLabClient;
pub use http::encode_component;
pub use reference::RepositoryReference;
pub use registry::ProviderRegistry;

use crate::contract::TreeEntry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported source-control hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    GitHub,
    GitLab,
}

impl ProviderKind {
    /// Dispatch order: the first marker found in the URL wins
    pub const ALL: [ProviderKind; 2] = [ProviderKind::GitHub, ProviderKind::GitLab];

    /// Host substring that identifies this provider in a repository URL
    pub fn host_marker(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github.com",
            ProviderKind::GitLab => "gitlab.com",
        }
    }

    pub fn detect(url: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| url.contains(kind.host_marker()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github",
            ProviderKind::GitLab => "gitlab",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::GitHub => f.pad("GitHub"),
            ProviderKind::GitLab => f.pad("GitLab"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "github" => Ok(ProviderKind::GitHub),
            "gitlab" => Ok(ProviderKind::GitLab),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// One source-control host's REST API
///
/// Implementations only talk to the network; filtering, per-file error
/// policy and result assembly live in [`crate::scanner::ContractScanner`].
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Parse a repository URL without touching the network
    ///
    /// # Errors
    /// `ScanError::InvalidUrl` when the URL does not have this provider's shape
    fn locate(
        &self,
        url: &str,
        branch: &str,
        access_token: Option<&str>,
    ) -> Result<RepositoryReference, ScanError>;

    /// List every entry of the repository tree at the reference's branch
    async fn list_tree(&self, repo: &RepositoryReference) -> Result<Vec<TreeEntry>, ScanError>;

    /// Fetch one file's content as text
    async fn fetch_content(
        &self,
        repo: &RepositoryReference,
        path: &str,
    ) -> Result<String, ScanError>;

    /// Whether the repository exists and is readable with the given credential
    async fn check_access(&self, repo: &RepositoryReference) -> Result<bool, ScanError>;
}
