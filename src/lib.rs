// Public API exports
pub mod config;
pub mod contract;
pub mod provider;
pub mod scanner;
pub mod security;
pub mod store;

// Re-export main types for convenience
pub use config::ScannerConfig;

pub use contract::{
    ContractInfo, ContractKind, EntryKind, ParseResult, ParsedContract, SkippedFile, TreeEntry,
    decode_base64_content, extract_contract_info, filter_contract_entries, is_contract_path,
};

pub use provider::{
    GitHubClient, GitLabClient, ProviderKind, ProviderRegistry, RepositoryProvider,
    RepositoryReference, ScanError,
};

pub use scanner::ContractScanner;

pub use store::{ContractRecord, ContractStore, NewRepository, RepositoryRecord, ScanRecord};
