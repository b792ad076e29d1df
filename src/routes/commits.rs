//! Initial render payload.
//!
//! GET /api/v1/commits?days_back=&author=
//!
//! Re-locates repositories, extracts commits for the lookback window, and
//! returns `{ commits, repos, daysBack }`. Query parameters override the
//! server defaults for this request only.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::app::SharedState;
use crate::error::Result;
use crate::models::RenderPayload;

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/commits", get(get_commits))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CommitsQuery {
    days_back: Option<u32>,
    author: Option<String>,
}

async fn get_commits(
    State(state): State<SharedState>,
    Query(query): Query<CommitsQuery>,
) -> Result<Json<RenderPayload>> {
    let config = state.defaults().with_overrides(query.days_back, query.author);
    let payload = state.refresh(&config).await?;
    Ok(Json(payload))
}
