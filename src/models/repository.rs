//! Repository DTOs.
//!
//! - `RepositoryEntry`: a located repository root with its display label
//! - `RepositoryListing`: located repositories flagged with the current selection
//! - `SelectionRequest`: request body for changing the selection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub path: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryListItem {
    pub path: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryListing {
    pub roots: Vec<String>,
    pub repositories: Vec<RepositoryListItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionRequest {
    pub paths: Vec<String>,
}
