//! Repository discovery under workspace roots.
//!
//! Walks each root with an explicit work-list. A directory is a repository
//! root when it directly contains a `.git` directory. The walk never descends
//! into `.git` itself, into build/dependency/cache output directories, or
//! through symbolic links. Directories that cannot be read are skipped.
//!
//! Every listing is an await point, so a long walk does not monopolize the
//! runtime.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::GitError;
use crate::models::RepositoryEntry;

/// Directory whose presence marks a repository root.
pub const MARKER_DIR: &str = ".git";

/// Directory names pruned at any depth.
pub const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "bower_components",
    "target",
    "dist",
    "build",
    "out",
    "vendor",
    ".venv",
    "venv",
    "__pycache__",
    ".cache",
    ".next",
    ".nuxt",
    ".gradle",
    ".tox",
];

/// Locate every repository root under `roots`.
///
/// The result is a set; traversal order does not affect it.
pub async fn locate(roots: &[PathBuf]) -> BTreeSet<PathBuf> {
    let start = std::time::Instant::now();
    let mut found = BTreeSet::new();
    let mut pending: Vec<PathBuf> = roots.to_vec();
    let mut visited = 0usize;

    while let Some(dir) = pending.pop() {
        visited += 1;
        match scan_directory(&dir).await {
            Ok(scan) => {
                if scan.is_repository {
                    found.insert(dir);
                }
                pending.extend(scan.children);
            }
            Err(e) => tracing::debug!("Skipping directory: {}", e),
        }
    }

    tracing::info!(
        "Located {} repositories in {} directories ({:?})",
        found.len(),
        visited,
        start.elapsed()
    );
    found
}

#[derive(Debug, Default)]
struct DirectoryScan {
    is_repository: bool,
    children: Vec<PathBuf>,
}

async fn scan_directory(dir: &Path) -> Result<DirectoryScan, GitError> {
    let unreadable = |source| GitError::DirectoryUnreadable {
        path: dir.display().to_string(),
        source,
    };

    let mut entries = fs::read_dir(dir).await.map_err(unreadable)?;
    let mut scan = DirectoryScan::default();

    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        // file_type() does not follow symlinks, so links are never directories here
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name == MARKER_DIR {
            scan.is_repository = true;
            continue;
        }
        if is_skipped(&name) {
            continue;
        }

        scan.children.push(entry.path());
    }

    Ok(scan)
}

fn is_skipped(name: &str) -> bool {
    SKIP_DIRS.contains(&name)
}

/// Canonicalize workspace roots, dropping anything that is not an existing
/// directory. Duplicates collapse.
pub async fn resolve_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut resolved = Vec::new();

    for root in roots {
        match fs::canonicalize(root).await {
            Ok(path) if path.is_dir() => {
                if !resolved.contains(&path) {
                    resolved.push(path);
                }
            }
            Ok(path) => tracing::warn!("Ignoring workspace root (not a directory): {}", path.display()),
            Err(e) => tracing::warn!("Ignoring workspace root {}: {}", root.display(), e),
        }
    }

    resolved
}

/// Display label for a repository: its path relative to the closest root
/// containing it, or its base name when it is a root itself or lies outside
/// every root.
pub fn repo_label(repo: &Path, roots: &[PathBuf]) -> String {
    if roots.iter().any(|root| root == repo) {
        return base_name(repo);
    }

    roots
        .iter()
        .filter_map(|root| repo.strip_prefix(root).ok())
        .filter(|relative| !relative.as_os_str().is_empty())
        .min_by_key(|relative| relative.components().count())
        .map(|relative| relative.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|| base_name(repo))
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Attach labels and impose a stable display order (label, then path).
pub fn describe(found: &BTreeSet<PathBuf>, roots: &[PathBuf]) -> Vec<RepositoryEntry> {
    let mut entries: Vec<RepositoryEntry> = found
        .iter()
        .map(|path| RepositoryEntry {
            path: path.to_string_lossy().to_string(),
            label: repo_label(path, roots),
        })
        .collect();

    entries.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.path.cmp(&b.path)));
    entries
}
