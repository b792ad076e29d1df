//! Application error types and HTTP response mapping.
//!
//! Two layers of errors live here:
//! - `AppError`: request-level failures. Implements Axum's `IntoResponse` so
//!   handlers can return it directly with a JSON error body.
//! - `GitError`: failures scoped to one directory, repository, or log record.
//!   These are recovered where they happen (logged, then skipped) and never
//!   abort a discovery walk or an extraction pass.
//!
//! Error mappings:
//! - `NoWorkspaceOpen`, `NoRepositoriesFound` → 404
//! - `InvalidPath` → 400
//! - `Io`, `Internal` → 500

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No workspace open: pass at least one existing directory")]
    NoWorkspaceOpen,

    #[error("No git repositories found under the workspace roots")]
    NoRepositoriesFound,

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoWorkspaceOpen | AppError::NoRepositoriesFound => StatusCode::NOT_FOUND,
            AppError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            AppError::Io(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures recovered locally during discovery and extraction.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to read directory {path}: {source}")]
    DirectoryUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git command failed in {repo}: {message}")]
    CommandFailed { repo: String, message: String },

    #[error("Malformed log record: expected 4 fields, found {found}")]
    MalformedRecord { found: usize },

    #[error("Invalid commit timestamp: {value}")]
    InvalidTimestamp { value: String },

    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NoWorkspaceOpen, StatusCode::NOT_FOUND),
            (AppError::NoRepositoriesFound, StatusCode::NOT_FOUND),
            (AppError::InvalidPath("/x".into()), StatusCode::BAD_REQUEST),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_malformed_record_message() {
        let err = GitError::MalformedRecord { found: 2 };
        assert_eq!(err.to_string(), "Malformed log record: expected 4 fields, found 2");
    }
}
