//! View model DTOs produced by the view pipeline.
//!
//! - `TaggedCommit`: a commit plus its classified type tag
//! - `DerivedGroup`: one calendar day of commits, with labels and copy summary
//! - `ViewStats`: aggregate numbers for the header
//! - `ViewModel`: everything the page renders

use serde::Serialize;

use super::Commit;
use crate::view::CommitType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedCommit {
    #[serde(flatten)]
    pub commit: Commit,
    #[serde(rename = "type")]
    pub commit_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedGroup {
    /// ISO date (`YYYY-MM-DD`) in local time.
    pub key: String,
    pub label: String,
    pub count: usize,
    pub count_label: String,
    pub collapsed: bool,
    /// Plain-text summary for clipboard copy.
    pub summary: String,
    pub commits: Vec<TaggedCommit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewStats {
    pub total: usize,
    pub dominant_type: Option<CommitType>,
    pub type_counts: Vec<TypeCount>,
    pub latest_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub groups: Vec<DerivedGroup>,
    pub stats: ViewStats,
}
