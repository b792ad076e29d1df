//! Delimited `git log` output parsing.
//!
//! The log query asks git for one record per commit, four fields each:
//! short hash, strict ISO-8601 author date, subject, author name. Fields are
//! separated by ASCII unit separator (0x1F) and records terminated by ASCII
//! record separator (0x1E). Neither can appear in a commit subject, so
//! subjects containing `|`, `:` or any other printable character survive
//! intact.

use chrono::{DateTime, FixedOffset};

use crate::error::GitError;

pub const FIELD_SEPARATOR: char = '\u{1f}';
pub const RECORD_SEPARATOR: char = '\u{1e}';

/// `--pretty` format producing `hash␟date␟subject␟author␞`.
pub const LOG_FORMAT: &str = "%h%x1f%aI%x1f%s%x1f%an%x1e";

const FIELD_COUNT: usize = 4;

/// One parsed log record. Only constructed with all four fields present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub hash: String,
    pub timestamp: DateTime<FixedOffset>,
    pub subject: String,
    /// Empty when git reported no author name.
    pub author: String,
}

impl LogRecord {
    /// Parse a single record (without its record separator).
    ///
    /// # Errors
    ///
    /// Returns `GitError::MalformedRecord` when the record does not split into
    /// exactly four fields or the hash is empty, and
    /// `GitError::InvalidTimestamp` when the date is not RFC 3339.
    pub fn parse(record: &str) -> Result<Self, GitError> {
        let fields: Vec<&str> = record.split(FIELD_SEPARATOR).collect();
        let [hash, date, subject, author] = fields.as_slice() else {
            return Err(GitError::MalformedRecord {
                found: fields.len(),
            });
        };

        let hash = hash.trim();
        if hash.is_empty() {
            return Err(GitError::MalformedRecord { found: FIELD_COUNT });
        }

        let timestamp = DateTime::parse_from_rfc3339(date.trim()).map_err(|_| {
            GitError::InvalidTimestamp {
                value: date.to_string(),
            }
        })?;

        Ok(Self {
            hash: hash.to_string(),
            timestamp,
            subject: subject.to_string(),
            author: author.trim().to_string(),
        })
    }
}

/// Parse raw log output. Malformed records are dropped; they never affect
/// the records around them.
pub fn parse_log(raw: &str) -> Vec<LogRecord> {
    raw.split(RECORD_SEPARATOR)
        // git separates formatted entries with a newline
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.trim().is_empty())
        .filter_map(|record| match LogRecord::parse(record) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!("Dropping log record: {}", e);
                None
            }
        })
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any printable subject survives a format/parse cycle
        #[test]
        fn prop_printable_subject_preserved(subject in "[ -~]{0,80}") {
            let raw = format!("abc1234\u{1f}2024-03-04T05:06:07-05:00\u{1f}{subject}\u{1f}Ada\u{1e}");
            let parsed = parse_log(&raw);
            prop_assert_eq!(parsed.len(), 1);
            prop_assert_eq!(&parsed[0].subject, &subject);
        }

        /// Property: parsing never panics on arbitrary input
        #[test]
        fn prop_parse_never_panics(raw in ".*") {
            let _ = parse_log(&raw);
        }
    }
}
