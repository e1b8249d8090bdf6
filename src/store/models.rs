use crate::contract::ContractKind;
use crate::provider::{ProviderKind, RepositoryReference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A repository connection request, already validated by the caller
#[derive(Debug, Clone)]
pub struct NewRepository {
    pub name: String,
    pub full_name: String,
    pub provider: ProviderKind,
    pub url: String,
    pub branch: String,
    pub access_token: Option<String>,
}

impl NewRepository {
    pub fn from_reference(url: impl Into<String>, repo: &RepositoryReference) -> Self {
        Self {
            name: repo.name.clone(),
            full_name: repo.full_name(),
            provider: repo.kind,
            url: url.into(),
            branch: repo.branch.clone(),
            access_token: repo.access_token.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub provider: ProviderKind,
    pub url: String,
    pub branch: String,
    #[serde(skip_serializing, default)]
    pub access_token: Option<String>,
    pub is_active: bool,
    pub last_scan_at: Option<DateTime<Utc>>,
    pub contracts_detected: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRecord {
    pub id: i64,
    pub repository_id: i64,
    pub scan_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub kind: ContractKind,
    pub content: String,
    /// Hex SHA-256 of `content`
    pub content_hash: String,
    pub last_updated: DateTime<Utc>,
}

/// One completed parse of a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: Uuid,
    pub repository_id: i64,
    pub branch: String,
    pub contracts_found: u32,
    pub files_skipped: u32,
    pub scanned_at: DateTime<Utc>,
}
