mod models;


pub use models::{ContractRecord, NewRepository, RepositoryRecord, ScanRecord};

use crate::contract::ParseResult;
use anyhow::{Context, Result, bail};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

const REPOSITORY_COLUMNS: &str = "id, name, full_name, provider, url, branch, access_token, \
     is_active, last_scan_at, contracts_detected, created_at";

const CONTRACT_COLUMNS: &str = "id, repository_id, scan_id, file_name, file_path, contract_type, \
     content, content_hash, last_updated";

/// SQLite persistence for connected repositories and their scanned contracts
pub struct ContractStore {
    conn: Connection,
}

impl ContractStore {
    /// Create a new in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        Self::from_connection(conn)
    }

    /// Open (or create) a store file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS repositories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                full_name TEXT NOT NULL,
                provider TEXT NOT NULL,
                url TEXT NOT NULL UNIQUE,
                branch TEXT NOT NULL,
                access_token TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                last_scan_at TEXT,
                contracts_detected INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS contracts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                repository_id INTEGER NOT NULL,
                scan_id BLOB NOT NULL,
                file_name TEXT NOT NULL,
                file_path TEXT NOT NULL,
                contract_type TEXT NOT NULL,
                content TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                last_updated TEXT NOT NULL,
                UNIQUE (repository_id, file_path),
                FOREIGN KEY (repository_id) REFERENCES repositories(id)
            );

            CREATE TABLE IF NOT EXISTS scans (
                id BLOB PRIMARY KEY,
                repository_id INTEGER NOT NULL,
                branch TEXT NOT NULL,
                contracts_found INTEGER NOT NULL,
                files_skipped INTEGER NOT NULL,
                scanned_at TEXT NOT NULL,
                FOREIGN KEY (repository_id) REFERENCES repositories(id)
            );

            CREATE INDEX IF NOT EXISTS idx_contracts_repository ON contracts(repository_id);
            CREATE INDEX IF NOT EXISTS idx_scans_repository ON scans(repository_id);
            "#,
            )
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Insert a repository connection
    pub fn insert_repository(&self, repo: &NewRepository) -> Result<RepositoryRecord> {
        let now = Utc::now();
        self.conn
            .execute(
                "INSERT INTO repositories (name, full_name, provider, url, branch, access_token, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    repo.name,
                    repo.full_name,
                    repo.provider.as_str(),
                    repo.url,
                    repo.branch,
                    repo.access_token,
                    now
                ],
            )
            .with_context(|| format!("Failed to insert repository: {}", repo.url))?;

        let id = self.conn.last_insert_rowid();
        self.get_repository(id)?
            .with_context(|| format!("Repository {} vanished after insert", id))
    }

    pub fn get_repository(&self, id: i64) -> Result<Option<RepositoryRecord>> {
        let sql = format!("SELECT {} FROM repositories WHERE id = ?1", REPOSITORY_COLUMNS);
        self.conn
            .query_row(&sql, params![id], repository_from_row)
            .optional()
            .with_context(|| format!("Failed to query repository {}", id))
    }

    pub fn find_repository_by_url(&self, url: &str) -> Result<Option<RepositoryRecord>> {
        let sql = format!("SELECT {} FROM repositories WHERE url = ?1", REPOSITORY_COLUMNS);
        self.conn
            .query_row(&sql, params![url], repository_from_row)
            .optional()
            .with_context(|| format!("Failed to query repository {}", url))
    }

    pub fn list_repositories(&self) -> Result<Vec<RepositoryRecord>> {
        let sql = format!("SELECT {} FROM repositories ORDER BY id", REPOSITORY_COLUMNS);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .context("Failed to prepare statement")?;

        let repositories = stmt
            .query_map([], repository_from_row)
            .context("Failed to query repositories")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to collect repositories")?;

        Ok(repositories)
    }

    /// Replace a repository's stored contracts with the outcome of a parse
    /// of `branch`.
    ///
    /// Runs in one transaction. A result carrying an error, or one parsed from
    /// a branch other than the connected one, is rejected and leaves the store
    /// untouched.
    pub fn record_scan(
        &mut self,
        repository_id: i64,
        branch: &str,
        result: &ParseResult,
    ) -> Result<ScanRecord> {
        if let Some(error) = &result.error {
            bail!("Refusing to record failed scan: {}", error);
        }

        let repository = self
            .get_repository(repository_id)?
            .with_context(|| format!("Repository {} not found", repository_id))?;

        if repository.branch != branch {
            bail!(
                "Scanned branch '{}' does not match connected branch '{}' of {}",
                branch,
                repository.branch,
                repository.full_name
            );
        }

        let scan = ScanRecord {
            id: Uuid::new_v4(),
            repository_id,
            branch: branch.to_string(),
            contracts_found: result.contracts.len() as u32,
            files_skipped: result.skipped.len() as u32,
            scanned_at: Utc::now(),
        };

        let tx = self
            .conn
            .transaction()
            .context("Failed to begin transaction")?;

        tx.execute(
            "DELETE FROM contracts WHERE repository_id = ?1",
            params![repository_id],
        )
        .context("Failed to clear previous contracts")?;

        for contract in &result.contracts {
            tx.execute(
                "INSERT INTO contracts (repository_id, scan_id, file_name, file_path, contract_type, content, content_hash, last_updated) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    repository_id,
                    scan.id,
                    contract.file_name,
                    contract.file_path,
                    contract.kind.as_str(),
                    contract.content,
                    content_hash(&contract.content),
                    scan.scanned_at
                ],
            )
            .with_context(|| format!("Failed to insert contract: {}", contract.file_path))?;
        }

        tx.execute(
            "INSERT INTO scans (id, repository_id, branch, contracts_found, files_skipped, scanned_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                scan.id,
                repository_id,
                scan.branch,
                scan.contracts_found,
                scan.files_skipped,
                scan.scanned_at
            ],
        )
        .context("Failed to insert scan")?;

        tx.execute(
            "UPDATE repositories SET last_scan_at = ?1, contracts_detected = ?2, updated_at = ?1 WHERE id = ?3",
            params![scan.scanned_at, scan.contracts_found, repository_id],
        )
        .context("Failed to update repository")?;

        tx.commit().context("Failed to commit scan")?;

        info!(
            repository_id,
            scan_id = %scan.id,
            contracts = scan.contracts_found,
            skipped = scan.files_skipped,
            "scan recorded"
        );
        Ok(scan)
    }

    pub fn contracts_for_repository(&self, repository_id: i64) -> Result<Vec<ContractRecord>> {
        let sql = format!(
            "SELECT {} FROM contracts WHERE repository_id = ?1 ORDER BY file_path",
            CONTRACT_COLUMNS
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .context("Failed to prepare statement")?;

        let contracts = stmt
            .query_map(params![repository_id], |row| {
                Ok(ContractRecord {
                    id: row.get(0)?,
                    repository_id: row.get(1)?,
                    scan_id: row.get(2)?,
                    file_name: row.get(3)?,
                    file_path: row.get(4)?,
                    kind: parse_column(row, 5)?,
                    content: row.get(6)?,
                    content_hash: row.get(7)?,
                    last_updated: row.get(8)?,
                })
            })
            .context("Failed to query contracts")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to collect contracts")?;

        Ok(contracts)
    }

    /// Scan history, newest first
    pub fn scans_for_repository(&self, repository_id: i64) -> Result<Vec<ScanRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, repository_id, branch, contracts_found, files_skipped, scanned_at \
                 FROM scans WHERE repository_id = ?1 ORDER BY scanned_at DESC",
            )
            .context("Failed to prepare statement")?;

        let scans = stmt
            .query_map(params![repository_id], |row| {
                Ok(ScanRecord {
                    id: row.get(0)?,
                    repository_id: row.get(1)?,
                    branch: row.get(2)?,
                    contracts_found: row.get(3)?,
                    files_skipped: row.get(4)?,
                    scanned_at: row.get(5)?,
                })
            })
            .context("Failed to query scans")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to collect scans")?;

        Ok(scans)
    }
}

/// Hex SHA-256 of contract source
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

fn repository_from_row(row: &Row<'_>) -> rusqlite::Result<RepositoryRecord> {
    Ok(RepositoryRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        full_name: row.get(2)?,
        provider: parse_column(row, 3)?,
        url: row.get(4)?,
        branch: row.get(5)?,
        access_token: row.get(6)?,
        is_active: row.get(7)?,
        last_scan_at: row.get(8)?,
        contracts_detected: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}
