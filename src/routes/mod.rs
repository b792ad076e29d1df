//! API route handlers - maps HTTP endpoints to timesheet operations.
//!
//! Each submodule defines routes for a feature area:
//! - `repositories`: Located repositories and the persisted selection
//! - `commits`: Initial render payload (extracts commits)
//! - `view`: Filtered, grouped view model over the current commits
//! - `intent`: Copy and refresh intents from the page

pub mod commits;
pub mod intent;
pub mod repositories;
pub mod view;

use axum::Router;

use crate::app::SharedState;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .merge(repositories::routes(state.clone()))
        .merge(commits::routes(state.clone()))
        .merge(view::routes(state.clone()))
        .merge(intent::routes(state))
}
