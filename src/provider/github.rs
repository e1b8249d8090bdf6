use super::http::{build_client, encode_path, send_checked};
use super::{ProviderKind, RepositoryProvider, RepositoryReference, ScanError};
use crate::config::ScannerConfig;
use crate::contract::{TreeEntry, decode_base64_content};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::warn;

const ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Deserialize)]
struct TreeListing {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// GitHub REST v3 client
pub struct GitHubClient {
    http: Client,
    base_url: String,
    user_agent: String,
}

impl GitHubClient {
    pub fn new(config: &ScannerConfig) -> Result<Self, ScanError> {
        Ok(Self::with_client(build_client(config)?, config))
    }

    /// Share an existing connection pool
    pub fn with_client(http: Client, config: &ScannerConfig) -> Self {
        Self {
            http,
            base_url: config.github_api.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    fn get(&self, url: String, repo: &RepositoryReference) -> RequestBuilder {
        let request = self
            .http
            .get(url)
            .header("Accept", ACCEPT)
            .header("User-Agent", self.user_agent.as_str());

        match &repo.access_token {
            Some(token) => request.header("Authorization", format!("token {}", token)),
            None => request,
        }
    }

    fn repo_url(&self, repo: &RepositoryReference) -> String {
        format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.name)
    }
}

#[async_trait]
impl RepositoryProvider for GitHubClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitHub
    }

    fn locate(
        &self,
        url: &str,
        branch: &str,
        access_token: Option<&str>,
    ) -> Result<RepositoryReference, ScanError> {
        RepositoryReference::parse_github(url, branch, access_token)
    }

    async fn list_tree(&self, repo: &RepositoryReference) -> Result<Vec<TreeEntry>, ScanError> {
        let url = format!("{}/git/trees/{}", self.repo_url(repo), repo.branch);
        let request = self.get(url, repo).query(&[("recursive", "1")]);
        let listing: TreeListing = send_checked(self.kind(), request).await?.json().await?;

        if listing.truncated {
            warn!(
                repository = %repo.full_name(),
                entries = listing.tree.len(),
                "GitHub truncated the tree listing; some files are not visible"
            );
        }

        Ok(listing.tree)
    }

    async fn fetch_content(
        &self,
        repo: &RepositoryReference,
        path: &str,
    ) -> Result<String, ScanError> {
        let url = format!("{}/contents/{}", self.repo_url(repo), encode_path(path));
        let request = self.get(url, repo).query(&[("ref", repo.branch.as_str())]);
        let envelope: ContentEnvelope = send_checked(self.kind(), request).await?.json().await?;

        match envelope.encoding.as_deref() {
            None | Some("base64") => decode_base64_content(&envelope.content),
            Some(other) => Err(ScanError::Decode(format!(
                "unsupported content encoding '{}'",
                other
            ))),
        }
    }

    async fn check_access(&self, repo: &RepositoryReference) -> Result<bool, ScanError> {
        let response = self.get(self.repo_url(repo), repo).send().await?;
        Ok(response.status().is_success())
    }
}
