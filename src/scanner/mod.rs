
use crate::config::ScannerConfig;
use crate::contract::{
    ContractInfo, ParseResult, ParsedContract, SkippedFile, extract_contract_info,
    filter_contract_entries,
};
use crate::provider::{
    ProviderRegistry, RepositoryProvider, RepositoryReference, ScanError,
};
use crate::security::sanitize_tree_path;
use tracing::{debug, info, warn};

/// Entry point for repository scanning.
///
/// Holds no mutable state: build one per process and share it.
/// Neither `parse_repository` nor `validate_repository` can fail; every
/// error is folded into the returned value.
pub struct ContractScanner {
    registry: ProviderRegistry,
    default_branch: String,
}

impl ContractScanner {
    pub fn new(config: ScannerConfig) -> Result<Self, ScanError> {
        let registry = ProviderRegistry::with_defaults(&config)?;
        Ok(Self::with_registry(registry, config.default_branch))
    }

    pub fn with_registry(registry: ProviderRegistry, default_branch: impl Into<String>) -> Self {
        Self {
            registry,
            default_branch: default_branch.into(),
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Fetch every `.sol`/`.vy` file of a repository branch.
    ///
    /// Files are fetched one at a time. A file whose content cannot be read
    /// lands in `skipped`; a failed tree listing fails the whole parse.
    pub async fn parse_repository(
        &self,
        url: &str,
        branch: Option<&str>,
        access_token: Option<&str>,
    ) -> ParseResult {
        match self.try_parse(url, branch, access_token).await {
            Ok(result) => result,
            Err(e) => {
                warn!(url = %url, error = %e, "repository parse failed");
                ParseResult::failure(e.to_string())
            }
        }
    }

    /// Whether the URL names an existing repository readable with `access_token`
    pub async fn validate_repository(&self, url: &str, access_token: Option<&str>) -> bool {
        match self.try_validate(url, access_token).await {
            Ok(valid) => valid,
            Err(e) => {
                debug!(url = %url, error = %e, "repository validation failed");
                false
            }
        }
    }

    /// See [`extract_contract_info`]; never called during parsing
    pub fn extract_contract_info(&self, content: &str, file_name: &str) -> ContractInfo {
        extract_contract_info(content, file_name)
    }

    async fn try_parse(
        &self,
        url: &str,
        branch: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<ParseResult, ScanError> {
        let provider = self
            .registry
            .select(url)
            .ok_or(ScanError::UnsupportedProvider)?;
        let branch = branch
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(self.default_branch.as_str());
        let repo = provider.locate(url, branch, access_token)?;

        let entries = provider.list_tree(&repo).await?;
        let total_entries = entries.len();
        let candidates = filter_contract_entries(entries);
        debug!(
            repository = %repo.full_name(),
            entries = total_entries,
            candidates = candidates.len(),
            "tree listed"
        );

        let mut contracts = Vec::with_capacity(candidates.len());
        let mut skipped = Vec::new();

        for entry in candidates {
            match fetch_contract(provider, &repo, &entry.path).await {
                Ok(contract) => contracts.push(contract),
                Err(e) => {
                    warn!(path = %entry.path, error = %e, "skipping contract file");
                    skipped.push(SkippedFile {
                        path: entry.path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            provider = %repo.kind,
            repository = %repo.full_name(),
            branch = %repo.branch,
            contracts = contracts.len(),
            skipped = skipped.len(),
            "repository parsed"
        );

        Ok(ParseResult::success(contracts, skipped))
    }

    async fn try_validate(&self, url: &str, access_token: Option<&str>) -> Result<bool, ScanError> {
        let provider = self
            .registry
            .select(url)
            .ok_or(ScanError::UnsupportedProvider)?;
        let repo = provider.locate(url, &self.default_branch, access_token)?;
        provider.check_access(&repo).await
    }
}

async fn fetch_contract(
    provider: &dyn RepositoryProvider,
    repo: &RepositoryReference,
    raw_path: &str,
) -> Result<ParsedContract, ScanError> {
    let path = sanitize_tree_path(raw_path)?;
    let content = provider.fetch_content(repo, &path).await?;

    ParsedContract::from_path(&path, content).ok_or(ScanError::InvalidPath(path))
}
