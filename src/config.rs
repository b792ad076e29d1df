//! Extraction configuration.
//!
//! A `TimesheetConfig` is assembled once per request (server defaults plus
//! any per-request overrides) and passed explicitly into every extraction
//! call. Nothing reads settings from ambient state.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DAYS_BACK: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetConfig {
    /// Lookback window in days. Zero means "since local midnight today".
    pub days_back: u32,
    /// Author filter override. `None` falls back to each repository's
    /// configured `user.name`.
    pub author: Option<String>,
}

impl Default for TimesheetConfig {
    fn default() -> Self {
        Self {
            days_back: DEFAULT_DAYS_BACK,
            author: None,
        }
    }
}

impl TimesheetConfig {
    pub fn new(days_back: u32, author: Option<String>) -> Self {
        Self {
            days_back,
            author: normalize_author(author),
        }
    }

    /// Derive a per-request config. Unset overrides keep the current values.
    pub fn with_overrides(&self, days_back: Option<u32>, author: Option<String>) -> Self {
        Self {
            days_back: days_back.unwrap_or(self.days_back),
            author: normalize_author(author).or_else(|| self.author.clone()),
        }
    }
}

fn normalize_author(author: Option<String>) -> Option<String> {
    author
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let config = TimesheetConfig::default();
        assert_eq!(config.days_back, 30);
        assert!(config.author.is_none());
    }

    #[test]
    fn test_blank_author_is_no_override() {
        assert_eq!(TimesheetConfig::new(7, Some("   ".into())).author, None);
        assert_eq!(
            TimesheetConfig::new(7, Some(" Ada Lovelace ".into())).author,
            Some("Ada Lovelace".to_string())
        );
    }

    #[test]
    fn test_overrides_do_not_mutate_defaults() {
        let defaults = TimesheetConfig::new(30, Some("Ada".into()));
        let request = defaults.with_overrides(Some(7), Some("Grace".into()));

        assert_eq!(request.days_back, 7);
        assert_eq!(request.author.as_deref(), Some("Grace"));
        assert_eq!(defaults.days_back, 30);
        assert_eq!(defaults.author.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_overrides_fall_back_to_defaults() {
        let defaults = TimesheetConfig::new(14, Some("Ada".into()));
        let request = defaults.with_overrides(None, Some(String::new()));
        assert_eq!(request, defaults);
    }
}
