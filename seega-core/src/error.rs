//! Rejection reasons for game and session operations
//!
//! Every variant is an expected, caller-facing condition. The `Display` text
//! is the explanation sent back to the player who made the call.

/// Rule violations reported by the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Wrong phase for this action.")]
    WrongPhase,

    #[error("Invalid position.")]
    InvalidPosition,

    #[error("You have already placed all of your pieces.")]
    AllotmentExhausted,

    #[error("You can only move your own pieces.")]
    NotOwner,

    #[error("The destination is occupied.")]
    DestinationOccupied,

    #[error("Invalid move. Pieces move one cell horizontally or vertically.")]
    IllegalDistance,

    #[error("It is not your turn.")]
    NotYourTurn,

    #[error("The game is over.")]
    GameOver,
}

/// Session-level errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("The session already has two players.")]
    SessionFull,

    #[error("Unknown player id: {0}")]
    UnknownParticipant(i64),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Wire lines that are not notifications
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseNotificationError {
    #[error("empty notification")]
    Empty,

    #[error("unknown notification tag: {0}")]
    UnknownTag(String),

    #[error("malformed {tag} notification: {line:?}")]
    Malformed { tag: &'static str, line: String },
}
