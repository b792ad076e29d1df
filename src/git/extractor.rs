//! Commit extraction across repositories.
//!
//! For each repository: resolve the effective author (explicit override, else
//! the repository's `user.name`, else no filter), run the log query for the
//! lookback window, and parse the delimited output. A repository that fails
//! at any step contributes zero commits; the others are unaffected.
//!
//! No ordering is imposed on the aggregate. Sorting belongs to the view
//! pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Days, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::config::TimesheetConfig;
use crate::error::GitError;
use crate::git::parser::{LogRecord, parse_log};
use crate::git::runner::{GitRunner, LogQuery};
use crate::models::{Commit, RepositoryEntry};

/// Start of the local day `days_back` days before `now`. Commits at or after
/// this instant are inside the lookback window. Windows reaching past the
/// Unix epoch start at the epoch.
pub fn lookback_start<Tz: TimeZone>(now: &DateTime<Tz>, days_back: u32) -> DateTime<FixedOffset> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH.fixed_offset();
    let tz = now.timezone();

    now.date_naive()
        .checked_sub_days(Days::new(u64::from(days_back)))
        .and_then(|day| {
            start_of_day(day, |local| {
                tz.from_local_datetime(local).earliest().map(|start| start.fixed_offset())
            })
        })
        .map_or(epoch, |start| start.max(epoch))
}

/// First resolvable quarter hour of `day`. Midnight does not exist on days
/// where a DST gap starts at 00:00.
fn start_of_day<F>(day: NaiveDate, resolve: F) -> Option<DateTime<FixedOffset>>
where
    F: Fn(&NaiveDateTime) -> Option<DateTime<FixedOffset>>,
{
    (0..96u32)
        .filter_map(|quarter| day.and_hms_opt(quarter / 4, (quarter % 4) * 15, 0))
        .find_map(|local| resolve(&local))
}

#[derive(Clone)]
pub struct CommitExtractor {
    runner: Arc<dyn GitRunner>,
}

impl CommitExtractor {
    pub fn new(runner: Arc<dyn GitRunner>) -> Self {
        Self { runner }
    }

    /// Extract commits from every repository using the current local time.
    pub async fn extract(&self, repos: &[RepositoryEntry], config: &TimesheetConfig) -> Vec<Commit> {
        let since = lookback_start(&Local::now(), config.days_back);
        self.extract_since(repos, config, since).await
    }

    pub async fn extract_since(
        &self,
        repos: &[RepositoryEntry],
        config: &TimesheetConfig,
        since: DateTime<FixedOffset>,
    ) -> Vec<Commit> {
        let start = Instant::now();
        let mut commits = Vec::new();

        for repo in repos {
            match self.extract_repository(repo, config, since).await {
                Ok(mut found) => {
                    tracing::debug!("{}: {} commits", repo.label, found.len());
                    commits.append(&mut found);
                }
                Err(e) => tracing::warn!("No commits from {}: {}", repo.label, e),
            }
            tokio::task::yield_now().await;
        }

        tracing::info!(
            "Extracted {} commits from {} repositories since {} in {:?}",
            commits.len(),
            repos.len(),
            since.to_rfc3339(),
            start.elapsed()
        );
        commits
    }

    async fn extract_repository(
        &self,
        repo: &RepositoryEntry,
        config: &TimesheetConfig,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<Commit>, GitError> {
        let path = Path::new(&repo.path);
        let author = self.effective_author(path, config).await;
        let query = LogQuery {
            since,
            author: author.clone(),
        };

        let raw = self.runner.log(path, &query).await?;
        let fallback_author = author.unwrap_or_default();

        Ok(parse_log(&raw)
            .into_iter()
            .filter(|record| record.timestamp >= since)
            .map(|record| into_commit(record, repo, &fallback_author))
            .collect())
    }

    async fn effective_author(&self, repo: &Path, config: &TimesheetConfig) -> Option<String> {
        if let Some(author) = &config.author {
            return Some(author.clone());
        }

        match self.runner.user_name(repo).await {
            Ok(name) if !name.trim().is_empty() => Some(name.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("No local identity for {}: {}", repo.display(), e);
                None
            }
        }
    }
}

fn into_commit(record: LogRecord, repo: &RepositoryEntry, fallback_author: &str) -> Commit {
    let author = if record.author.is_empty() {
        fallback_author.to_string()
    } else {
        record.author
    };

    Commit {
        hash: record.hash,
        timestamp: record.timestamp,
        message: record.subject,
        author,
        repo_path: repo.path.clone(),
        repo_label: repo.label.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Timelike;
    use similar_asserts::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned log output per repository path; `None` fails the query.
    #[derive(Default)]
    struct FakeRunner {
        logs: HashMap<String, Option<String>>,
        identities: HashMap<String, String>,
        queries: Mutex<Vec<(String, LogQuery)>>,
    }

    impl FakeRunner {
        fn with_log(mut self, repo: &str, raw: Option<&str>) -> Self {
            self.logs.insert(repo.to_string(), raw.map(str::to_string));
            self
        }

        fn with_identity(mut self, repo: &str, name: &str) -> Self {
            self.identities.insert(repo.to_string(), name.to_string());
            self
        }
    }

    #[async_trait]
    impl GitRunner for FakeRunner {
        async fn user_name(&self, repo: &Path) -> Result<String, GitError> {
            Ok(self
                .identities
                .get(repo.to_string_lossy().as_ref())
                .cloned()
                .unwrap_or_default())
        }

        async fn log(&self, repo: &Path, query: &LogQuery) -> Result<String, GitError> {
            let key = repo.to_string_lossy().to_string();
            self.queries.lock().unwrap().push((key.clone(), query.clone()));
            match self.logs.get(&key) {
                Some(Some(raw)) => Ok(raw.clone()),
                _ => Err(GitError::CommandFailed {
                    repo: key,
                    message: "exit status: 128".to_string(),
                }),
            }
        }
    }

    fn entry(path: &str) -> RepositoryEntry {
        RepositoryEntry {
            path: path.to_string(),
            label: path.trim_start_matches('/').to_string(),
        }
    }

    fn record(hash: &str, date: &str, subject: &str, author: &str) -> String {
        format!("{hash}\u{1f}{date}\u{1f}{subject}\u{1f}{author}\u{1e}\n")
    }

    fn since() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap()
    }

    #[tokio::test]
    async fn test_failing_repository_does_not_abort_others() {
        let good_log = format!(
            "{}{}",
            record("aaaaaaa", "2024-01-02T10:00:00+00:00", "feat: one", "Ada"),
            record("bbbbbbb", "2024-01-03T10:00:00+00:00", "fix: two", "Ada"),
        );
        let runner = FakeRunner::default()
            .with_log("/broken", None)
            .with_log("/good", Some(good_log.as_str()));
        let extractor = CommitExtractor::new(Arc::new(runner));

        let commits = extractor
            .extract_since(&[entry("/broken"), entry("/good")], &TimesheetConfig::default(), since())
            .await;

        let hashes: Vec<&str> = commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["aaaaaaa", "bbbbbbb"]);
        assert!(commits.iter().all(|c| c.repo_path == "/good" && c.repo_label == "good"));
    }

    #[tokio::test]
    async fn test_override_takes_precedence_over_identity() {
        let runner = Arc::new(
            FakeRunner::default()
                .with_log("/repo", Some(""))
                .with_identity("/repo", "Local Name"),
        );
        let extractor = CommitExtractor::new(runner.clone());
        let config = TimesheetConfig::new(30, Some("Override".into()));

        extractor.extract_since(&[entry("/repo")], &config, since()).await;

        let queries = runner.queries.lock().unwrap();
        assert_eq!(queries[0].1.author.as_deref(), Some("Override"));
    }

    #[tokio::test]
    async fn test_identity_used_when_no_override() {
        let runner = Arc::new(
            FakeRunner::default()
                .with_log("/repo", Some(""))
                .with_log("/anon", Some(""))
                .with_identity("/repo", "Local Name"),
        );
        let extractor = CommitExtractor::new(runner.clone());

        extractor
            .extract_since(&[entry("/repo"), entry("/anon")], &TimesheetConfig::default(), since())
            .await;

        let queries = runner.queries.lock().unwrap();
        assert_eq!(queries[0].1.author.as_deref(), Some("Local Name"));
        assert_eq!(queries[1].1.author, None);
    }

    #[tokio::test]
    async fn test_missing_author_falls_back_to_identity() {
        let log = record("ccccccc", "2024-01-05T08:00:00+00:00", "chore: tidy", "");
        let runner = FakeRunner::default()
            .with_log("/repo", Some(log.as_str()))
            .with_identity("/repo", "Local Name");
        let extractor = CommitExtractor::new(Arc::new(runner));

        let commits = extractor
            .extract_since(&[entry("/repo")], &TimesheetConfig::default(), since())
            .await;

        assert_eq!(commits[0].author, "Local Name");
    }

    #[tokio::test]
    async fn test_commits_before_window_are_dropped() {
        let log = format!(
            "{}{}",
            record("old0000", "2023-12-31T23:59:59+00:00", "fix: late", "Ada"),
            record("new0000", "2024-01-01T00:00:00+00:00", "fix: early", "Ada"),
        );
        let runner = FakeRunner::default().with_log("/repo", Some(log.as_str()));
        let extractor = CommitExtractor::new(Arc::new(runner));

        let commits = extractor
            .extract_since(&[entry("/repo")], &TimesheetConfig::default(), since())
            .await;

        let hashes: Vec<&str> = commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["new0000"]);
    }

    #[tokio::test]
    async fn test_empty_output_contributes_nothing() {
        let runner = FakeRunner::default().with_log("/repo", Some(""));
        let extractor = CommitExtractor::new(Arc::new(runner));

        let commits = extractor
            .extract_since(&[entry("/repo")], &TimesheetConfig::default(), since())
            .await;

        assert!(commits.is_empty());
    }

    #[test]
    fn test_lookback_start_is_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 42, 7).unwrap();

        assert_eq!(lookback_start(&now, 0).to_rfc3339(), "2024-03-10T00:00:00+00:00");
        assert_eq!(lookback_start(&now, 30).to_rfc3339(), "2024-02-09T00:00:00+00:00");
    }

    #[test]
    fn test_lookback_start_respects_offset() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        // 2024-03-10 01:00 in UTC+9, still 2024-03-09 in UTC
        let now = tz.with_ymd_and_hms(2024, 3, 10, 1, 0, 0).unwrap();

        assert_eq!(lookback_start(&now, 1).to_rfc3339(), "2024-03-09T00:00:00+09:00");
    }

    #[test]
    fn test_huge_lookback_clamps_to_epoch() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 42, 7).unwrap();

        for days_back in [100_000, 100_000_000, u32::MAX] {
            assert_eq!(lookback_start(&now, days_back).to_rfc3339(), "1970-01-01T00:00:00+00:00");
        }
    }

    #[test]
    fn test_start_of_day_skips_missing_midnight() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 10, 6).unwrap();
        // clocks jump from 00:00 straight to 01:00
        let resolve = |local: &NaiveDateTime| {
            (local.hour() >= 1).then(|| offset.from_local_datetime(local).unwrap())
        };

        let start = start_of_day(day, resolve).unwrap();

        assert_eq!(start.to_rfc3339(), "2024-10-06T01:00:00-03:00");
    }
}
