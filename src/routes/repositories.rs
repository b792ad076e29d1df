//! Repository listing and selection.
//!
//! - GET /api/v1/repositories
//!   Re-locates repositories under the workspace roots and lists them with
//!   labels and `selected` flags.
//!
//! - POST /api/v1/repositories/selection { paths: string[] }
//!   Narrows extraction to the given repositories (empty = all) and
//!   remembers the choice for this workspace.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::app::SharedState;
use crate::error::Result;
use crate::models::{RepositoryListing, SelectionRequest};

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/repositories", get(list_repositories))
        .route("/api/v1/repositories/selection", post(update_selection))
        .with_state(state)
}

async fn list_repositories(State(state): State<SharedState>) -> Result<Json<RepositoryListing>> {
    let listing = state.rescan().await?;
    Ok(Json(listing))
}

async fn update_selection(
    State(state): State<SharedState>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<RepositoryListing>> {
    let listing = state.select(request.paths).await?;
    Ok(Json(listing))
}
