use super::ContractKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shallow metadata pulled out of contract source by pattern matching
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pragma_version: Option<String>,
    /// Import statements in source order, duplicates kept
    pub imports: Vec<String>,
    /// `function name(params)` signatures in source order, duplicates kept
    pub functions: Vec<String>,
}

struct Patterns {
    pragma: Regex,
    contract: Option<Regex>,
    import: Regex,
    function: Regex,
}

// Parameter lists are matched one level deep: `[^)]*` stops at the first `)`,
// so defaults like `f(uint a = g(1))` are cut short.
static SOLIDITY: Lazy<Patterns> = Lazy::new(|| Patterns {
    pragma: Regex::new(r"pragma\s+solidity\s+([^;]+);").unwrap(),
    contract: Some(Regex::new(r"contract\s+(\w+)").unwrap()),
    import: Regex::new(r"import\s+[^;]+;").unwrap(),
    function: Regex::new(r"function\s+\w+\s*\([^)]*\)").unwrap(),
});

static VYPER: Lazy<Patterns> = Lazy::new(|| Patterns {
    pragma: Regex::new(r"(?m)^[ \t]*#[ \t]*(?:pragma[ \t]+version|@version)[ \t]+([^\r\n]+)")
        .unwrap(),
    contract: None,
    import: Regex::new(r"(?m)^[ \t]*(?:from[ \t]+\S+[ \t]+)?import[ \t]+[^\r\n#]+").unwrap(),
    function: Regex::new(r"def\s+\w+\s*\([^)]*\)").unwrap(),
});

/// Extract pragma, contract name, imports and function signatures.
///
/// Pure: no I/O and no state, so identical input always yields identical
/// output. `file_name` only selects the pattern set (`.vy` → Vyper shapes,
/// anything else → Solidity shapes) and names Vyper contracts, which have
/// no declaration keyword.
pub fn extract_contract_info(content: &str, file_name: &str) -> ContractInfo {
    let is_vyper = ContractKind::from_path(file_name) == Some(ContractKind::Vyper);
    let patterns: &Patterns = if is_vyper { &VYPER } else { &SOLIDITY };

    let pragma_version = patterns
        .pragma
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());

    let contract_name = match &patterns.contract {
        Some(re) => re
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
        None => vyper_contract_name(file_name),
    };

    let imports = patterns
        .import
        .find_iter(content)
        .map(|m| m.as_str().trim().to_string())
        .collect();

    let functions = patterns
        .function
        .find_iter(content)
        .map(|m| m.as_str().trim().to_string())
        .collect();

    ContractInfo {
        contract_name,
        pragma_version,
        imports,
        functions,
    }
}

fn vyper_contract_name(file_name: &str) -> Option<String> {
    let base = file_name.rsplit('/').next()?;
    let stem = base.strip_suffix(".vy")?;
    (!stem.is_empty()).then(|| stem.to_string())
}
