//! Commit record produced by extraction.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One commit from one repository's log. Never mutated after extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Abbreviated hash, unique within its repository.
    pub hash: String,
    /// Author date with the offset it was recorded in.
    pub timestamp: DateTime<FixedOffset>,
    /// Subject line of the commit message.
    pub message: String,
    pub author: String,
    pub repo_path: String,
    pub repo_label: String,
}
