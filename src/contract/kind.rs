use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized contract file suffixes, matched case-sensitively
pub const CONTRACT_EXTENSIONS: [&str; 2] = [".sol", ".vy"];

/// Contract language, decided by file extension alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    Solidity,
    Vyper,
}

impl ContractKind {
    /// `.sol` → Solidity, `.vy` → Vyper, anything else → None
    pub fn from_path(path: &str) -> Option<Self> {
        if path.ends_with(".sol") {
            Some(ContractKind::Solidity)
        } else if path.ends_with(".vy") {
            Some(ContractKind::Vyper)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::Solidity => "solidity",
            ContractKind::Vyper => "vyper",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for ContractKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solidity" => Ok(ContractKind::Solidity),
            "vyper" => Ok(ContractKind::Vyper),
            other => Err(format!("Unknown contract type: {}", other)),
        }
    }
}

pub fn is_contract_path(path: &str) -> bool {
    CONTRACT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
