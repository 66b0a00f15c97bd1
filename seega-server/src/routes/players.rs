//! Seat registration

use crate::state::ServerState;
use axum::{extract::State, Json};
use seega_core::Side;
use serde::Serialize;
use std::sync::Arc;

/// Sentinel id returned when both seats are taken
pub const SESSION_FULL: i16 = -1;

#[derive(Serialize)]
pub struct RegisterResponse {
    pub player_id: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Claim a seat
pub async fn register(State(state): State<Arc<ServerState>>) -> Json<RegisterResponse> {
    let response = match state.session.register() {
        Ok(id) => RegisterResponse {
            player_id: id.into(),
            side: state.session.side_of(id).ok(),
            error: None,
        },
        Err(e) => RegisterResponse {
            player_id: SESSION_FULL,
            side: None,
            error: Some(e.to_string()),
        },
    };
    Json(response)
}
