mod decode;
mod extract;
mod kind;
mod result;


pub use decode::decode_base64_content;
pub use extract::{ContractInfo, extract_contract_info};
pub use kind::{CONTRACT_EXTENSIONS, ContractKind, is_contract_path};
pub use result::{EntryKind, ParseResult, ParsedContract, SkippedFile, TreeEntry};

/// Keep only file entries whose path carries a contract extension
pub fn filter_contract_entries(entries: Vec<TreeEntry>) -> Vec<TreeEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.kind == EntryKind::Blob && is_contract_path(&entry.path))
        .collect()
}
