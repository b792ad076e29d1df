//! git-timesheet: commit timesheets across local repositories.
//!
//! Finds every git repository under a set of workspace roots, extracts the
//! configured author's recent commits from all of them, and turns the flat
//! commit list into a filterable, day-grouped view for timesheet reporting.
//!
//! Pipeline: roots → [`git::locator`] → repositories → [`git::CommitExtractor`]
//! → commits → [`view::build`] → [`models::ViewModel`].
//!
//! The binary serves that view over HTTP (see [`routes`]) or prints it with
//! `git-timesheet report`.

pub mod app;
pub mod config;
pub mod error;
pub mod git;
pub mod models;
pub mod report;
pub mod routes;
pub mod session;
pub mod view;
