//! Process and repository access used by extraction.
//!
//! `GitRunner` is the seam between extraction logic and the outside world:
//! the identity query (who is the local author?) and the log query. `GitCli`
//! is the real implementation; tests substitute their own.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tokio::process::Command;

use crate::error::GitError;
use crate::git::parser::LOG_FORMAT;

/// Parameters for one repository's log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub since: DateTime<FixedOffset>,
    pub author: Option<String>,
}

impl LogQuery {
    /// Arguments passed to `git`, across all refs.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "log".to_string(),
            "--all".to_string(),
            "--no-color".to_string(),
            format!("--since={}", self.since.to_rfc3339()),
            format!("--pretty=format:{LOG_FORMAT}"),
        ];

        if let Some(author) = &self.author {
            // author names are matched literally, not as regexes
            args.push("--fixed-strings".to_string());
            args.push(format!("--author={author}"));
        }

        args
    }
}

#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Locally configured author display name, or empty when unset.
    async fn user_name(&self, repo: &Path) -> Result<String, GitError>;

    /// Raw delimited log output for `query`.
    async fn log(&self, repo: &Path, query: &LogQuery) -> Result<String, GitError>;
}

/// Runs the `git` executable for log queries and reads identity through git2.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitCli {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl GitRunner for GitCli {
    async fn user_name(&self, repo: &Path) -> Result<String, GitError> {
        let repo = repo.to_path_buf();
        let display = repo.display().to_string();

        tokio::task::spawn_blocking(move || read_user_name(&repo))
            .await
            .map_err(|e| GitError::CommandFailed {
                repo: display,
                message: e.to_string(),
            })?
    }

    async fn log(&self, repo: &Path, query: &LogQuery) -> Result<String, GitError> {
        let failed = |message: String| GitError::CommandFailed {
            repo: repo.display().to_string(),
            message,
        };

        let output = Command::new(&self.program)
            .current_dir(repo)
            .args(query.args())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(failed(format!("{} ({})", stderr, output.status)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// `user.name` as git resolves it for this repository (local, then global,
/// then system configuration).
fn read_user_name(repo: &Path) -> Result<String, GitError> {
    let repository = git2::Repository::open(repo)?;
    let config = repository.config()?.snapshot()?;

    match config.get_string("user.name") {
        Ok(name) => Ok(name.trim().to_string()),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}
