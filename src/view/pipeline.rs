//! Commit list + view state → renderable view model.
//!
//! Steps, each a pure function of its inputs:
//! 1. filter by since-date, type, and search term
//! 2. stable sort by timestamp in the requested direction
//! 3. bucket by local calendar day
//! 4. order buckets in the same direction as the commits inside them
//! 5. aggregate stats
//!
//! The input commits are never mutated; the same inputs always produce the
//! same output.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use super::classify::{CommitType, classify, scope};
use super::labels::{count_label, day_label, day_summary, relative_time};
use super::state::{SortDirection, ViewState};
use crate::models::{Commit, DerivedGroup, TaggedCommit, TypeCount, ViewModel, ViewStats};

/// Build the view model in the local timezone.
pub fn build(commits: &[Commit], state: &ViewState) -> ViewModel {
    build_at(commits, state, &Local::now())
}

/// Build the view model as seen at `now`. Day boundaries use `now`'s
/// timezone.
pub fn build_at<Tz: TimeZone>(commits: &[Commit], state: &ViewState, now: &DateTime<Tz>) -> ViewModel {
    let tz = now.timezone();
    let visible = sort(filter(commits, state, &tz), state.sort);
    let groups = group(visible, state, &tz, now.date_naive());
    let stats = stats(&groups, now);

    ViewModel { groups, stats }
}

fn local_day<Tz: TimeZone>(commit: &Commit, tz: &Tz) -> NaiveDate {
    commit.timestamp.with_timezone(tz).date_naive()
}

fn filter<Tz: TimeZone>(commits: &[Commit], state: &ViewState, tz: &Tz) -> Vec<TaggedCommit> {
    let since = state.since_date();
    let term = state.search.to_lowercase();

    commits
        .iter()
        .filter(|commit| since.is_none_or(|since| local_day(commit, tz) >= since))
        .filter_map(|commit| {
            let commit_type = classify(&commit.message);
            state
                .type_filter
                .matches(&commit_type)
                .then(|| TaggedCommit {
                    commit: commit.clone(),
                    commit_type,
                })
        })
        .filter(|tagged| term.is_empty() || search_matches(&tagged.commit, &term).any())
        .collect()
}

/// Which searchable fields of a commit contain the (lower-cased) term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchMatch {
    pub message: bool,
    pub hash: bool,
    pub scope: bool,
}

impl SearchMatch {
    pub fn any(self) -> bool {
        self.message || self.hash || self.scope
    }
}

pub fn search_matches(commit: &Commit, term: &str) -> SearchMatch {
    SearchMatch {
        message: commit.message.to_lowercase().contains(term),
        hash: commit.hash.to_lowercase().contains(term),
        scope: scope(&commit.message).is_some_and(|s| s.to_lowercase().contains(term)),
    }
}

fn sort(mut commits: Vec<TaggedCommit>, direction: SortDirection) -> Vec<TaggedCommit> {
    // sort_by is stable: equal timestamps keep their input order
    match direction {
        SortDirection::Desc => commits.sort_by(|a, b| b.commit.timestamp.cmp(&a.commit.timestamp)),
        SortDirection::Asc => commits.sort_by(|a, b| a.commit.timestamp.cmp(&b.commit.timestamp)),
    }
    commits
}

fn group<Tz: TimeZone>(
    commits: Vec<TaggedCommit>,
    state: &ViewState,
    tz: &Tz,
    today: NaiveDate,
) -> Vec<DerivedGroup> {
    let mut buckets: BTreeMap<NaiveDate, Vec<TaggedCommit>> = BTreeMap::new();
    for tagged in commits {
        buckets
            .entry(local_day(&tagged.commit, tz))
            .or_default()
            .push(tagged);
    }

    let ordered: Vec<(NaiveDate, Vec<TaggedCommit>)> = match state.sort {
        SortDirection::Asc => buckets.into_iter().collect(),
        SortDirection::Desc => buckets.into_iter().rev().collect(),
    };

    ordered
        .into_iter()
        .map(|(day, commits)| {
            let key = day.format("%Y-%m-%d").to_string();
            DerivedGroup {
                label: day_label(day, today),
                count: commits.len(),
                count_label: count_label(commits.len()),
                collapsed: state.is_collapsed(&key),
                summary: day_summary(&key, &commits),
                key,
                commits,
            }
        })
        .collect()
}

fn stats<Tz: TimeZone>(groups: &[DerivedGroup], now: &DateTime<Tz>) -> ViewStats {
    let mut type_counts: Vec<TypeCount> = CommitType::ALL
        .iter()
        .map(|&commit_type| TypeCount {
            commit_type,
            count: 0,
        })
        .collect();

    for tagged in groups.iter().flat_map(|g| g.commits.iter()) {
        let commit_type = CommitType::from_tag(&tagged.commit_type);
        if let Some(entry) = type_counts.iter_mut().find(|c| c.commit_type == commit_type) {
            entry.count += 1;
        }
    }

    // strict comparison keeps the earliest vocabulary entry on ties
    let mut dominant_type: Option<&TypeCount> = None;
    for entry in type_counts.iter().filter(|c| c.count > 0) {
        if dominant_type.is_none_or(|best| entry.count > best.count) {
            dominant_type = Some(entry);
        }
    }
    let dominant_type = dominant_type.map(|c| c.commit_type);

    let total = groups.iter().map(|g| g.count).sum();
    let latest_label = groups
        .first()
        .and_then(|g| g.commits.first())
        .map(|first| relative_time(&first.commit.timestamp, now));

    ViewStats {
        total,
        dominant_type,
        type_counts,
        latest_label,
    }
}
