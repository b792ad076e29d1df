//! Intents sent by the page.
//!
//! POST /api/v1/intent
//! - `{ "type": "copy", "text": "...", "target": "hash" | "subject" | "day" }`
//!   The page writes to its own clipboard; the server records the copy and
//!   returns a confirmation message for display.
//! - `{ "type": "refresh" }`
//!   Re-extracts with the server defaults and returns
//!   `{ "type": "commits", commits, repos, daysBack }`.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::app::SharedState;
use crate::error::Result;
use crate::models::{CopyAck, CopyTarget, InboundIntent, OutboundMessage};

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/intent", post(handle_intent))
        .with_state(state)
}

async fn handle_intent(
    State(state): State<SharedState>,
    Json(intent): Json<InboundIntent>,
) -> Result<Response> {
    match intent {
        InboundIntent::Copy { text, target } => Ok(Json(copy_ack(text, target)).into_response()),
        InboundIntent::Refresh => {
            let config = state.defaults().clone();
            let payload = state.refresh(&config).await?;
            Ok(Json(OutboundMessage::Commits(payload)).into_response())
        }
    }
}

fn copy_ack(text: String, target: CopyTarget) -> CopyAck {
    tracing::debug!("Copied {} ({} chars)", target.describe(), text.chars().count());

    let message = match target {
        CopyTarget::Hash => format!("Copied {}", text),
        CopyTarget::Day => format!("Copied {} ({} lines)", target.describe(), text.lines().count()),
        CopyTarget::Subject | CopyTarget::Text => format!("Copied {}", target.describe()),
    };

    CopyAck {
        text,
        target,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_ack_messages() {
        assert_eq!(copy_ack("a1b2c3d".into(), CopyTarget::Hash).message, "Copied a1b2c3d");
        assert_eq!(
            copy_ack("2024-01-01 (1 commit)\n- [app] fix: x (a1b2c3d)".into(), CopyTarget::Day).message,
            "Copied day summary (2 lines)"
        );
        assert_eq!(copy_ack("fix: x".into(), CopyTarget::Subject).message, "Copied commit subject");
    }
}
