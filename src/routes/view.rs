//! View model endpoint.
//!
//! GET /api/v1/view?search=&type=&since=&sort=&collapsed=
//!
//! Builds groups and stats from the session's current commits (extracting
//! once with the server defaults if nothing has been loaded yet). Does not
//! re-extract; use the refresh intent for that.
//!
//! `collapsed` is a comma-separated list of day keys.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::app::SharedState;
use crate::error::Result;
use crate::models::ViewModel;
use crate::view::{self, SortDirection, TypeFilter, ViewState};

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/view", get(get_view))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViewQuery {
    search: String,
    #[serde(rename = "type")]
    type_filter: TypeFilter,
    since: Option<String>,
    sort: SortDirection,
    collapsed: Option<String>,
}

impl From<ViewQuery> for ViewState {
    fn from(query: ViewQuery) -> Self {
        let collapsed = query
            .collapsed
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect();

        ViewState {
            search: query.search,
            type_filter: query.type_filter,
            since: query.since.filter(|s| !s.trim().is_empty()),
            sort: query.sort,
            collapsed,
        }
    }
}

async fn get_view(
    State(state): State<SharedState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ViewModel>> {
    state.ensure_loaded().await?;

    let view_state = ViewState::from(query);
    let session = state.read()?;
    Ok(Json(view::build(session.commits(), &view_state)))
}
