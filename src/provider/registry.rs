use super::{GitHubClient, GitLabClient, ProviderKind, RepositoryProvider, ScanError};
use crate::config::ScannerConfig;
use crate::provider::http::build_client;

/// Dispatch table from provider kind to client
pub struct ProviderRegistry {
    providers: Vec<Box<dyn RepositoryProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// GitHub and GitLab clients sharing one connection pool
    pub fn with_defaults(config: &ScannerConfig) -> Result<Self, ScanError> {
        let http = build_client(config)?;
        let mut registry = Self::new();
        registry.register(GitHubClient::with_client(http.clone(), config));
        registry.register(GitLabClient::with_client(http, config));
        Ok(registry)
    }

    /// Register a client, replacing any existing one of the same kind
    pub fn register(&mut self, provider: impl RepositoryProvider + 'static) {
        let kind = provider.kind();
        self.providers.retain(|p| p.kind() != kind);
        self.providers.push(Box::new(provider));
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&dyn RepositoryProvider> {
        self.providers
            .iter()
            .find(|p| p.kind() == kind)
            .map(|p| &**p)
    }

    /// Select the client owning a repository URL by host substring
    pub fn select(&self, url: &str) -> Option<&dyn RepositoryProvider> {
        ProviderKind::detect(url).and_then(|kind| self.get(kind))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
