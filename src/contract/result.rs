use super::ContractKind;
use serde::{Deserialize, Serialize};

/// Kind of a record in a provider's recursive tree listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    Blob,
    /// Directory
    Tree,
    /// Submodule pointer
    Commit,
    #[serde(other)]
    Other,
}

/// One file-or-directory record from a tree listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
        }
    }
}

/// A contract file fetched from a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedContract {
    /// Last `/`-separated segment of the path
    pub file_name: String,
    /// Repository-relative path
    pub file_path: String,
    /// Decoded source text
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ContractKind,
}

impl ParsedContract {
    /// Build from a repository path; None when the path has no contract extension
    pub fn from_path(path: &str, content: String) -> Option<Self> {
        let kind = ContractKind::from_path(path)?;
        let file_name = path.rsplit('/').next().unwrap_or_default().to_string();

        Some(Self {
            file_name,
            file_path: path.to_string(),
            content,
            kind,
        })
    }
}

/// A matched contract file whose content could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Uniform outcome of a repository parse.
///
/// When `error` is set both `contracts` and `skipped` are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub contracts: Vec<ParsedContract>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseResult {
    pub fn success(contracts: Vec<ParsedContract>, skipped: Vec<SkippedFile>) -> Self {
        Self {
            contracts,
            skipped,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            contracts: Vec::new(),
            skipped: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
