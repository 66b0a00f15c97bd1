//! SEEGA Core - Rules engine and session coordination
//!
//! This crate provides the core game logic for Seega:
//! - Board geometry (5x5 grid, forbidden center during placement)
//! - Placement and movement rules with custodial capture
//! - Win detection (elimination, full line)
//! - Notification records in their wire format
//! - Turn-synchronized two-player session with per-player mailboxes

pub mod board;
pub mod error;
pub mod game;
pub mod notification;
pub mod session;

// Re-exports for convenient access
pub use board::{Board, Cell, Pos, BOARD_SIZE, CENTER, DIRECTIONS, PIECES_PER_SIDE};
pub use error::{ParseNotificationError, RuleError, SessionError};
pub use game::{GameSnapshot, GameState, MoveOutcome, Phase, PlaceOutcome, RemainingPieces, Side, WinReason};
pub use notification::Notification;
pub use session::{ParticipantId, SessionCoordinator};
