//! User-controlled view state.
//!
//! The page owns this state; the pipeline only reads it.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::classify::CommitType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Feat,
    Fix,
    Refactor,
    Build,
    Merge,
    Other,
}

impl TypeFilter {
    /// Whether a classified tag passes this filter. `Other` matches every tag
    /// outside the fixed vocabulary.
    pub fn matches(self, tag: &str) -> bool {
        match self.commit_type() {
            None => true,
            Some(wanted) => CommitType::from_tag(tag) == wanted,
        }
    }

    fn commit_type(self) -> Option<CommitType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Feat => Some(CommitType::Feat),
            TypeFilter::Fix => Some(CommitType::Fix),
            TypeFilter::Refactor => Some(CommitType::Refactor),
            TypeFilter::Build => Some(CommitType::Build),
            TypeFilter::Merge => Some(CommitType::Merge),
            TypeFilter::Other => Some(CommitType::Other),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(TypeFilter::All),
            "feat" => Ok(TypeFilter::Feat),
            "fix" => Ok(TypeFilter::Fix),
            "refactor" => Ok(TypeFilter::Refactor),
            "build" => Ok(TypeFilter::Build),
            "merge" => Ok(TypeFilter::Merge),
            "other" => Ok(TypeFilter::Other),
            other => Err(format!(
                "unknown type filter '{other}' (expected feat, fix, refactor, build, merge, other or all)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "" | "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{other}' (expected asc or desc)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub search: String,
    #[serde(rename = "type")]
    pub type_filter: TypeFilter,
    /// Raw `YYYY-MM-DD` input. Anything unparseable means no lower bound.
    pub since: Option<String>,
    pub sort: SortDirection,
    /// Day keys the user has collapsed.
    pub collapsed: BTreeSet<String>,
}

impl ViewState {
    pub fn since_date(&self) -> Option<NaiveDate> {
        self.since
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    }

    pub fn is_collapsed(&self, day_key: &str) -> bool {
        self.collapsed.contains(day_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_filter_matches_unknown_tags() {
        assert!(TypeFilter::Other.matches("other"));
        assert!(TypeFilter::Other.matches("docs"));
        assert!(TypeFilter::Other.matches("chore"));
        assert!(!TypeFilter::Other.matches("feat"));
    }

    #[test]
    fn test_specific_and_all_filters() {
        assert!(TypeFilter::All.matches("anything"));
        assert!(TypeFilter::Fix.matches("fix"));
        assert!(!TypeFilter::Fix.matches("feat"));
        assert!(TypeFilter::Merge.matches("merge"));
    }

    #[test]
    fn test_parse_controls() {
        assert_eq!("FEAT".parse::<TypeFilter>(), Ok(TypeFilter::Feat));
        assert_eq!("".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert!("docs".parse::<TypeFilter>().is_err());
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_malformed_since_is_no_bound() {
        let mut state = ViewState {
            since: Some("2024-02-30".into()),
            ..Default::default()
        };
        assert_eq!(state.since_date(), None);

        state.since = Some("last tuesday".into());
        assert_eq!(state.since_date(), None);

        state.since = Some(" 2024-02-29 ".into());
        assert_eq!(state.since_date(), NaiveDate::from_ymd_opt(2024, 2, 29));
    }
}
