//! Chat and mailbox polling
//!
//! Players pull their notifications; the server never pushes. A poll may ask
//! to wait a short while for something to arrive, checking every 100 ms.

use super::game::ActionResponse;
use super::participant;
use crate::state::ServerState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Interval between mailbox checks while waiting
const POLL_STEP_MS: u64 = 100;

/// Longest a poll may wait
const MAX_WAIT_MS: u64 = 5_000;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub player_id: i64,
    pub message: String,
}

/// Broadcast a chat line
pub async fn chat(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<ChatRequest>,
) -> Json<ActionResponse> {
    let result = participant(req.player_id).and_then(|id| state.session.chat(id, &req.message));
    Json(result.into())
}

/// Poll query params
#[derive(Deserialize)]
pub struct PollParams {
    pub player_id: i64,
    pub wait_ms: Option<u64>,
}

#[derive(Serialize)]
pub struct PollResponse {
    pub messages: Vec<String>,
}

/// Drain the caller's mailbox
pub async fn poll(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<PollParams>,
) -> Json<PollResponse> {
    let steps = params.wait_ms.unwrap_or(0).min(MAX_WAIT_MS) / POLL_STEP_MS;

    // Ids that were never handed out have no mailbox
    let drain = || {
        participant(params.player_id)
            .map(|id| state.session.drain_mailbox(id))
            .unwrap_or_default()
    };

    let mut pending = drain();
    for _ in 0..steps {
        if !pending.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(POLL_STEP_MS)).await;
        pending = drain();
    }

    Json(PollResponse {
        messages: pending.iter().map(ToString::to_string).collect(),
    })
}
