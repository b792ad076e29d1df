//! Per-workspace session state and the persisted repository selection.
//!
//! `Session` is the explicit home of everything the server remembers between
//! requests: workspace roots, located repositories, which of them the user
//! selected, and the result of the last extraction. Nothing here is global;
//! the server owns one `Session` and hands it to handlers.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{Commit, RenderPayload, RepositoryEntry, RepositoryListItem, RepositoryListing};

/// Identity of a workspace: its canonical roots, sorted and newline-joined.
pub fn workspace_key(roots: &[PathBuf]) -> String {
    let mut parts: Vec<String> = roots.iter().map(|r| r.to_string_lossy().to_string()).collect();
    parts.sort();
    parts.join("\n")
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    roots: Vec<PathBuf>,
    repositories: Vec<RepositoryEntry>,
    selected: BTreeSet<String>,
    commits: Vec<Commit>,
    days_back: u32,
    loaded: bool,
}

impl Session {
    pub fn new(roots: Vec<PathBuf>, selected: impl IntoIterator<Item = String>) -> Self {
        Self {
            roots,
            selected: selected.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn workspace_key(&self) -> String {
        workspace_key(&self.roots)
    }

    pub fn repositories(&self) -> &[RepositoryEntry] {
        &self.repositories
    }

    pub fn set_repositories(&mut self, repositories: Vec<RepositoryEntry>) {
        self.repositories = repositories;
    }

    /// Replace the selection. Every path must be a located repository; an
    /// empty list selects everything.
    pub fn select(&mut self, paths: Vec<String>) -> Result<()> {
        if let Some(unknown) = paths
            .iter()
            .find(|p| !self.repositories.iter().any(|r| &r.path == *p))
        {
            return Err(AppError::InvalidPath(unknown.clone()));
        }

        self.selected = paths.into_iter().collect();
        Ok(())
    }

    pub fn selected(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Repositories to extract from. A selection naming no located
    /// repository (empty, or stale from a previous run) means all of them.
    pub fn active_repositories(&self) -> Vec<RepositoryEntry> {
        let chosen: Vec<RepositoryEntry> = self
            .repositories
            .iter()
            .filter(|r| self.selected.contains(&r.path))
            .cloned()
            .collect();

        if chosen.is_empty() {
            self.repositories.clone()
        } else {
            chosen
        }
    }

    pub fn listing(&self) -> RepositoryListing {
        let active: BTreeSet<String> = self.active_repositories().into_iter().map(|r| r.path).collect();

        RepositoryListing {
            roots: self.roots.iter().map(|r| r.to_string_lossy().to_string()).collect(),
            repositories: self
                .repositories
                .iter()
                .map(|r| RepositoryListItem {
                    path: r.path.clone(),
                    label: r.label.clone(),
                    selected: active.contains(&r.path),
                })
                .collect(),
        }
    }

    /// Replace the commit set wholesale with a fresh extraction.
    pub fn replace_commits(&mut self, commits: Vec<Commit>, days_back: u32) {
        self.commits = commits;
        self.days_back = days_back;
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn payload(&self) -> RenderPayload {
        RenderPayload {
            commits: self.commits.clone(),
            repos: self.active_repositories(),
            days_back: self.days_back,
        }
    }
}

/// JSON file mapping workspace keys to their last selected repositories.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    path: PathBuf,
}

type SelectionMap = BTreeMap<String, Vec<String>>;

impl SelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/git-timesheet/selection.json`, or the temp directory
    /// when the platform has no config dir.
    pub fn default_location() -> Self {
        let mut path = dirs::config_dir().unwrap_or_else(std::env::temp_dir);
        path.push("git-timesheet");
        path.push("selection.json");
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored selection for `key`. Missing or unreadable files read as empty.
    pub fn load(&self, key: &str) -> Vec<String> {
        self.read_map().remove(key).unwrap_or_default()
    }

    pub fn save(&self, key: &str, paths: &[String]) -> Result<()> {
        let mut map = self.read_map();
        if paths.is_empty() {
            map.remove(key);
        } else {
            map.insert(key.to_string(), paths.to_vec());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&map).map_err(|e| AppError::Internal(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn read_map(&self) -> SelectionMap {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use tempfile::TempDir;

    fn entry(path: &str, label: &str) -> RepositoryEntry {
        RepositoryEntry {
            path: path.to_string(),
            label: label.to_string(),
        }
    }

    fn session() -> Session {
        let mut session = Session::new(vec![PathBuf::from("/work")], Vec::new());
        session.set_repositories(vec![entry("/work/api", "api"), entry("/work/web", "web")]);
        session
    }

    #[test]
    fn test_empty_selection_means_all() {
        assert_eq!(session().active_repositories().len(), 2);
    }

    #[test]
    fn test_selection_narrows_extraction() {
        let mut session = session();
        session.select(vec!["/work/web".to_string()]).unwrap();

        assert_eq!(session.active_repositories(), vec![entry("/work/web", "web")]);
        let flags: Vec<bool> = session.listing().repositories.iter().map(|r| r.selected).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn test_selecting_unknown_path_fails() {
        let mut session = session();
        let err = session.select(vec!["/elsewhere".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(p) if p == "/elsewhere"));
        assert_eq!(session.active_repositories().len(), 2);
    }

    #[test]
    fn test_stale_selection_falls_back_to_all() {
        let mut session = Session::new(vec![PathBuf::from("/work")], vec!["/work/gone".to_string()]);
        session.set_repositories(vec![entry("/work/api", "api")]);
        assert_eq!(session.active_repositories(), vec![entry("/work/api", "api")]);
    }

    #[test]
    fn test_replace_commits_is_wholesale() {
        let mut session = session();
        assert!(!session.is_loaded());

        session.replace_commits(Vec::new(), 7);

        assert!(session.is_loaded());
        let payload = session.payload();
        assert_eq!(payload.days_back, 7);
        assert_eq!(payload.repos.len(), 2);
    }

    #[test]
    fn test_workspace_key_is_order_independent() {
        let a = workspace_key(&[PathBuf::from("/b"), PathBuf::from("/a")]);
        let b = workspace_key(&[PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_store_round_trip_per_workspace() {
        let temp = TempDir::new().unwrap();
        let store = SelectionStore::new(temp.path().join("nested/selection.json"));

        store.save("one", &["/work/api".to_string()]).unwrap();
        store.save("two", &["/other/x".to_string()]).unwrap();

        assert_eq!(store.load("one"), vec!["/work/api"]);
        assert_eq!(store.load("two"), vec!["/other/x"]);
        assert!(store.load("three").is_empty());

        store.save("one", &[]).unwrap();
        assert!(store.load("one").is_empty());
    }

    #[test]
    fn test_corrupt_store_reads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("selection.json");
        fs::write(&path, "{not json").unwrap();

        assert!(SelectionStore::new(path).load("any").is_empty());
    }
}
