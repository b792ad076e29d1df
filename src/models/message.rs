//! Messages exchanged with the presentation layer.
//!
//! - `RenderPayload`: initial render data `{ commits, repos, daysBack }`
//! - `OutboundMessage`: pushed after a refresh, tagged `type: "commits"`
//! - `InboundIntent`: `copy` and `refresh` requests from the page
//! - `CopyAck`: confirmation returned for a copy intent

use serde::{Deserialize, Serialize};

use super::{Commit, RepositoryEntry};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    pub commits: Vec<Commit>,
    pub repos: Vec<RepositoryEntry>,
    pub days_back: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Commits(RenderPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundIntent {
    Copy {
        text: String,
        #[serde(default)]
        target: CopyTarget,
    },
    Refresh,
}

/// What a copied piece of text represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyTarget {
    Hash,
    Subject,
    Day,
    #[default]
    #[serde(other)]
    Text,
}

impl CopyTarget {
    pub fn describe(self) -> &'static str {
        match self {
            CopyTarget::Hash => "commit hash",
            CopyTarget::Subject => "commit subject",
            CopyTarget::Day => "day summary",
            CopyTarget::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyAck {
    pub text: String,
    pub target: CopyTarget,
    pub message: String,
}
