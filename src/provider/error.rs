use super::ProviderKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Unsupported repository provider. Only GitHub and GitLab are supported.")]
    UnsupportedProvider,

    #[error("Invalid {0} URL format")]
    InvalidUrl(ProviderKind),

    #[error("{provider} API error: {status}")]
    Api { provider: ProviderKind, status: u16 },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode file content: {0}")]
    Decode(String),

    #[error("Invalid path in repository tree: {0}")]
    InvalidPath(String),
}

impl ScanError {
    /// Upstream status code, when the error came from a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            ScanError::Api { status, .. } => Some(*status),
            ScanError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
