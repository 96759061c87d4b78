use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

/// Cross-validation partition a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Training,
    Development,
    Testing,
}

impl Partition {
    /// All partitions in a fixed order.
    pub fn all() -> &'static [Partition] {
        &[Self::Training, Self::Development, Self::Testing]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Development => "development",
            Self::Testing => "testing",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "training" => Ok(Self::Training),
            "development" => Ok(Self::Development),
            "testing" => Ok(Self::Testing),
            _ => Err(CorpusError::UnknownPartition(s.to_string())),
        }
    }
}
