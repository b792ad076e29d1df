//! Human-readable labels for days, counts, and relative times, plus the
//! plain-text day summary used for clipboard copy.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use crate::models::TaggedCommit;

pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else {
        day.format("%A, %b %-d, %Y").to_string()
    }
}

pub fn count_label(count: usize) -> String {
    format!("{} commit{}", count, if count == 1 { "" } else { "s" })
}

pub fn relative_time<Tz: TimeZone>(timestamp: &DateTime<FixedOffset>, now: &DateTime<Tz>) -> String {
    let diff = now.timestamp() - timestamp.timestamp();

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

/// Text copied for a whole day:
///
/// ```text
/// 2024-01-02 (2 commits)
/// - [api] fix(auth): handle token refresh (a1b2c3d)
/// - [web] feat: dark mode (d4e5f6a)
/// ```
pub fn day_summary(key: &str, commits: &[TaggedCommit]) -> String {
    let mut summary = format!("{} ({})", key, count_label(commits.len()));
    for tagged in commits {
        let commit = &tagged.commit;
        summary.push_str(&format!(
            "\n- [{}] {} ({})",
            commit.repo_label, commit.message, commit.hash
        ));
    }
    summary
}
