//! Shared server state and the workspace → repositories → commits workflow.
//!
//! Handlers receive `SharedState`. The session lock is only held for short,
//! synchronous reads and writes; discovery and extraction run with no lock
//! held, and their result replaces the session's commits (last write wins).

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::TimesheetConfig;
use crate::error::{AppError, Result};
use crate::git::{CommitExtractor, GitRunner, locator};
use crate::models::{RenderPayload, RepositoryEntry, RepositoryListing};
use crate::session::{Session, SelectionStore};

/// Resolve user-supplied roots into canonical workspace directories.
pub async fn open_workspace(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let resolved = locator::resolve_roots(roots).await;
    if resolved.is_empty() {
        return Err(AppError::NoWorkspaceOpen);
    }
    Ok(resolved)
}

/// Locate and label every repository under the workspace roots.
pub async fn discover(roots: &[PathBuf]) -> Result<Vec<RepositoryEntry>> {
    let found = locator::locate(roots).await;
    if found.is_empty() {
        return Err(AppError::NoRepositoriesFound);
    }
    Ok(locator::describe(&found, roots))
}

pub struct AppState {
    session: RwLock<Session>,
    extractor: CommitExtractor,
    defaults: TimesheetConfig,
    store: SelectionStore,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build state for an opened workspace, restoring its saved selection.
    pub fn new(
        roots: Vec<PathBuf>,
        runner: Arc<dyn GitRunner>,
        defaults: TimesheetConfig,
        store: SelectionStore,
    ) -> Self {
        let selected = store.load(&crate::session::workspace_key(&roots));
        Self {
            session: RwLock::new(Session::new(roots, selected)),
            extractor: CommitExtractor::new(runner),
            defaults,
            store,
        }
    }

    pub fn defaults(&self) -> &TimesheetConfig {
        &self.defaults
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, Session>> {
        self.session
            .read()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Session>> {
        self.session
            .write()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))
    }

    /// Re-locate repositories under the workspace roots.
    pub async fn rescan(&self) -> Result<RepositoryListing> {
        let roots = self.read()?.roots().to_vec();
        let repositories = discover(&roots).await?;

        let mut session = self.write()?;
        session.set_repositories(repositories);
        Ok(session.listing())
    }

    /// Discover, extract, and replace the session's commits.
    pub async fn refresh(&self, config: &TimesheetConfig) -> Result<RenderPayload> {
        self.rescan().await?;
        let active = self.read()?.active_repositories();

        let commits = self.extractor.extract(&active, config).await;

        let mut session = self.write()?;
        session.replace_commits(commits, config.days_back);
        Ok(session.payload())
    }

    /// Extract with the default config unless a previous pass already did.
    pub async fn ensure_loaded(&self) -> Result<()> {
        let loaded = self.read()?.is_loaded();
        if !loaded {
            let config = self.defaults.clone();
            self.refresh(&config).await?;
        }
        Ok(())
    }

    /// Change and persist the repository selection.
    pub async fn select(&self, paths: Vec<String>) -> Result<RepositoryListing> {
        let located = !self.read()?.repositories().is_empty();
        if !located {
            self.rescan().await?;
        }

        let (key, selected, listing) = {
            let mut session = self.write()?;
            session.select(paths)?;
            (session.workspace_key(), session.selected(), session.listing())
        };

        let store = self.store.clone();
        let saved = tokio::task::spawn_blocking(move || store.save(&key, &selected))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
            .and_then(|saved| saved);
        if let Err(e) = saved {
            tracing::warn!("Failed to persist selection to {}: {}", self.store.path().display(), e);
        }
        Ok(listing)
    }
}
