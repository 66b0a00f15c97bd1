//! Game action endpoints
//!
//! Every action answers with the notifications it produced, rendered in the
//! wire format. A rejected action answers with a single explanation that is
//! never broadcast to the other player.

use super::{coord, participant};
use crate::state::ServerState;
use axum::{extract::State, Json};
use seega_core::{GameSnapshot, Notification, Pos, SessionError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of a game action
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub messages: Vec<String>,
}

impl From<Result<Vec<Notification>, SessionError>> for ActionResponse {
    fn from(result: Result<Vec<Notification>, SessionError>) -> Self {
        match result {
            Ok(notifications) => Self {
                success: true,
                messages: notifications.iter().map(ToString::to_string).collect(),
            },
            Err(e) => Self {
                success: false,
                messages: vec![e.to_string()],
            },
        }
    }
}

#[derive(Deserialize)]
pub struct PlaceRequest {
    pub player_id: i64,
    pub row: i64,
    pub col: i64,
}

/// Place a piece (placement phase)
pub async fn place_piece(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PlaceRequest>,
) -> Json<ActionResponse> {
    let pos = Pos::new(coord(req.row), coord(req.col));
    let result = participant(req.player_id).and_then(|id| state.session.place_piece(id, pos));
    Json(result.into())
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub player_id: i64,
    pub from_row: i64,
    pub from_col: i64,
    pub to_row: i64,
    pub to_col: i64,
}

/// Move a piece (movement phase)
pub async fn move_piece(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<MoveRequest>,
) -> Json<ActionResponse> {
    let from = Pos::new(coord(req.from_row), coord(req.from_col));
    let to = Pos::new(coord(req.to_row), coord(req.to_col));
    let result = participant(req.player_id).and_then(|id| state.session.move_piece(id, from, to));
    Json(result.into())
}

#[derive(Deserialize)]
pub struct PlayerRequest {
    pub player_id: i64,
}

/// Concede the game
pub async fn resign(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PlayerRequest>,
) -> Json<ActionResponse> {
    let result = participant(req.player_id).and_then(|id| state.session.resign(id));
    Json(result.into())
}

/// Current board, turn, allotments and winner
pub async fn get_state(State(state): State<Arc<ServerState>>) -> Json<GameSnapshot> {
    Json(state.session.snapshot())
}
