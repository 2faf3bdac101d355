use serde::{Deserialize, Serialize};
use std::fmt;

/// Chain identifier as accepted by the API: a numeric EVM chain id or a name
/// such as `"solana"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainId {
    Id(u64),
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    Evm,
    Solana,
}

impl ChainId {
    pub const SOLANA: &'static str = "solana";

    pub fn family(&self) -> ChainFamily {
        match self {
            Self::Id(_) => ChainFamily::Evm,
            Self::Name(name) if name.eq_ignore_ascii_case(Self::SOLANA) => ChainFamily::Solana,
            Self::Name(_) => ChainFamily::Evm,
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ChainId {
    fn from(value: &str) -> Self {
        match value.parse::<u64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Name(value.to_string()),
        }
    }
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evm => f.write_str("EVM"),
            Self::Solana => f.write_str("Solana"),
        }
    }
}
