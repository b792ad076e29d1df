//! Plain-text rendering of a view model for `git-timesheet report`.

use std::fmt::Write;

use crate::models::ViewModel;
use crate::view::labels::count_label;

/// Render the grouped timesheet, one block per day.
pub fn render(view: &ViewModel, days_back: u32) -> String {
    let mut out = String::new();
    let stats = &view.stats;

    let _ = write!(
        out,
        "{} in the last {} day{}",
        count_label(stats.total),
        days_back,
        if days_back == 1 { "" } else { "s" }
    );
    if let Some(dominant) = stats.dominant_type {
        let _ = write!(out, ", mostly {dominant}");
    }
    if let Some(latest) = &stats.latest_label {
        let _ = write!(out, ", latest {latest}");
    }
    out.push('\n');

    let hash_width = view
        .groups
        .iter()
        .flat_map(|g| g.commits.iter())
        .map(|c| c.commit.hash.len())
        .max()
        .unwrap_or(7);

    for group in &view.groups {
        let _ = write!(out, "\n{} ({}) - {}\n", group.label, group.key, group.count_label);
        for tagged in &group.commits {
            let commit = &tagged.commit;
            let _ = writeln!(
                out,
                "  {:<hash_width$}  {:<8}  [{}] {}",
                commit.hash, tagged.commit_type, commit.repo_label, commit.message
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Commit;
    use crate::view::{ViewState, build_at};
    use chrono::{DateTime, TimeZone, Utc};
    use similar_asserts::assert_eq;

    fn commit(hash: &str, rfc3339: &str, message: &str, repo: &str) -> Commit {
        Commit {
            hash: hash.to_string(),
            timestamp: DateTime::parse_from_rfc3339(rfc3339).unwrap(),
            message: message.to_string(),
            author: "Ada".to_string(),
            repo_path: format!("/work/{repo}"),
            repo_label: repo.to_string(),
        }
    }

    #[test]
    fn test_render_groups() {
        let commits = vec![
            commit("a1b2c3d", "2024-01-02T10:00:00Z", "fix(auth): handle token refresh", "api"),
            commit("d4e5f6a", "2024-01-01T09:00:00Z", "feat: dark mode", "web"),
        ];
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let view = build_at(&commits, &ViewState::default(), &now);

        let expected = "\
2 commits in the last 7 days, mostly feat, latest 2 hours ago

Today (2024-01-02) - 1 commit
  a1b2c3d  fix       [api] fix(auth): handle token refresh

Yesterday (2024-01-01) - 1 commit
  d4e5f6a  feat      [web] feat: dark mode
";
        assert_eq!(render(&view, 7), expected);
    }

    #[test]
    fn test_render_empty() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let view = build_at(&[], &ViewState::default(), &now);
        assert_eq!(render(&view, 1), "0 commits in the last 1 day\n");
    }
}
