use super::http::{build_client, encode_component, send_checked};
use super::{ProviderKind, RepositoryProvider, RepositoryReference, ScanError};
use crate::config::ScannerConfig;
use crate::contract::TreeEntry;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

const CONTENT_TYPE: &str = "application/json";

/// Largest page GitLab serves for tree listings
const TREE_PAGE_SIZE: &str = "100";

/// Stop following `x-next-page` after this many pages
const MAX_TREE_PAGES: u32 = 200;

/// GitLab REST v4 client
pub struct GitLabClient {
    http: Client,
    base_url: String,
}

impl GitLabClient {
    pub fn new(config: &ScannerConfig) -> Result<Self, ScanError> {
        Ok(Self::with_client(build_client(config)?, config))
    }

    /// Share an existing connection pool
    pub fn with_client(http: Client, config: &ScannerConfig) -> Self {
        Self {
            http,
            base_url: config.gitlab_api.clone(),
        }
    }

    fn get(&self, url: String, repo: &RepositoryReference) -> RequestBuilder {
        let request = self.http.get(url).header("Content-Type", CONTENT_TYPE);

        match &repo.access_token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    fn project_url(&self, repo: &RepositoryReference) -> String {
        format!("{}/projects/{}", self.base_url, repo.project_id())
    }
}

#[async_trait]
impl RepositoryProvider for GitLabClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitLab
    }

    fn locate(
        &self,
        url: &str,
        branch: &str,
        access_token: Option<&str>,
    ) -> Result<RepositoryReference, ScanError> {
        RepositoryReference::parse_gitlab(url, branch, access_token)
    }

    /// Follows `x-next-page` so listings longer than one page are complete;
    /// a single-page tree costs exactly one request.
    async fn list_tree(&self, repo: &RepositoryReference) -> Result<Vec<TreeEntry>, ScanError> {
        let url = format!("{}/repository/tree", self.project_url(repo));
        let mut entries = Vec::new();
        let mut page = String::from("1");

        for _ in 0..MAX_TREE_PAGES {
            let request = self.get(url.clone(), repo).query(&[
                ("recursive", "true"),
                ("ref", repo.branch.as_str()),
                ("per_page", TREE_PAGE_SIZE),
                ("page", page.as_str()),
            ]);
            let response = send_checked(self.kind(), request).await?;

            let next_page = response
                .headers()
                .get("x-next-page")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let batch: Vec<TreeEntry> = response.json().await?;
            debug!(repository = %repo.full_name(), page = %page, entries = batch.len(), "tree page");
            entries.extend(batch);

            match next_page {
                Some(next) => page = next,
                None => return Ok(entries),
            }
        }

        warn!(
            repository = %repo.full_name(),
            pages = MAX_TREE_PAGES,
            "tree listing stopped at page limit; some files are not visible"
        );
        Ok(entries)
    }

    async fn fetch_content(
        &self,
        repo: &RepositoryReference,
        path: &str,
    ) -> Result<String, ScanError> {
        let url = format!(
            "{}/repository/files/{}/raw",
            self.project_url(repo),
            encode_component(path)
        );
        let request = self.get(url, repo).query(&[("ref", repo.branch.as_str())]);

        Ok(send_checked(self.kind(), request).await?.text().await?)
    }

    async fn check_access(&self, repo: &RepositoryReference) -> Result<bool, ScanError> {
        let response = self.get(self.project_url(repo), repo).send().await?;
        Ok(response.status().is_success())
    }
}
