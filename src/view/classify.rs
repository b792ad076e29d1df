//! Conventional-commit type tags.
//!
//! `classify` derives a free-form tag from the message prefix (`feat:`,
//! `fix(scope):`, ...). The fixed vocabulary in `CommitType` is only applied
//! when counting and filtering: every tag outside it counts as `other`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)[(:]").expect("valid prefix regex"));

static SCOPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+\(([^)]*)\)").expect("valid scope regex"));

static MERGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^merge\b").expect("valid merge regex"));

pub const OTHER_TAG: &str = "other";

/// Tag for a commit subject. Pure and stable: the same message always yields
/// the same tag.
pub fn classify(message: &str) -> String {
    if let Some(captures) = PREFIX.captures(message) {
        return captures[1].to_lowercase();
    }
    if MERGE.is_match(message) {
        return CommitType::Merge.as_str().to_string();
    }
    OTHER_TAG.to_string()
}

/// Scope fragment of a conventional subject: `auth` in `fix(auth): ...`.
pub fn scope(message: &str) -> Option<&str> {
    SCOPE
        .captures(message)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Fixed vocabulary used for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Refactor,
    Build,
    Merge,
    Other,
}

impl CommitType {
    /// Vocabulary order; also the tie-break order for the dominant type.
    pub const ALL: [CommitType; 6] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Refactor,
        CommitType::Build,
        CommitType::Merge,
        CommitType::Other,
    ];

    /// Collapse a free-form tag onto the vocabulary.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "feat" => CommitType::Feat,
            "fix" => CommitType::Fix,
            "refactor" => CommitType::Refactor,
            "build" => CommitType::Build,
            "merge" => CommitType::Merge,
            _ => CommitType::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Refactor => "refactor",
            CommitType::Build => "build",
            CommitType::Merge => "merge",
            CommitType::Other => OTHER_TAG,
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: classification is stable across calls
        #[test]
        fn prop_classify_is_stable(message in ".*") {
            prop_assert_eq!(classify(&message), classify(&message));
        }

        /// Property: tags are lower-case alphabetic words
        #[test]
        fn prop_tag_is_lowercase_word(message in ".*") {
            let tag = classify(&message);
            prop_assert!(!tag.is_empty());
            prop_assert!(tag.chars().all(|c| c.is_ascii_lowercase()));
        }
    }
}
