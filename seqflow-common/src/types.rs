use crate::error::SeqError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a sequence is known to terminate without an explicit `limit`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Bound {
    Bounded,
    Unbounded,
}

impl Bound {
    pub fn is_bounded(self) -> bool {
        matches!(self, Bound::Bounded)
    }

    /// Bound of two sequences played one after the other.
    pub fn join(self, other: Bound) -> Bound {
        if self.is_bounded() && other.is_bounded() {
            Bound::Bounded
        } else {
            Bound::Unbounded
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

impl FromStr for ExecutionMode {
    type Err = SeqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(ExecutionMode::Sequential),
            "parallel" => Ok(ExecutionMode::Parallel),
            other => Err(SeqError::InvalidArgument(format!(
                "unknown execution mode: {other}"
            ))),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sequential => f.write_str("sequential"),
            ExecutionMode::Parallel => f.write_str("parallel"),
        }
    }
}
