//! Game state, placement/movement rules, capture and win detection

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Pos, CENTER, DIRECTIONS, PIECES_PER_SIDE};
use crate::error::RuleError;

/// Placements a side makes before the turn passes
const PLACEMENTS_PER_TURN: u8 = 2;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A = 0,
    B = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Game phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Placement,
    Movement,
}

impl Phase {
    /// Numeric code used in TURN notifications
    pub fn code(self) -> u8 {
        match self {
            Phase::Placement => 1,
            Phase::Movement => 2,
        }
    }
}

/// How a game was decided
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinReason {
    /// Opponent has no pieces left on the board
    Elimination,
    /// Full row or column of the winner's pieces
    Line,
    /// Opponent resigned
    Resignation,
}

/// Result of a successful placement
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceOutcome {
    pub side: Side,
    pub pos: Pos,
    pub next_side: Side,
    pub phase: Phase,
    pub winner: Option<Side>,
}

/// Result of a successful movement
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub side: Side,
    pub from: Pos,
    pub to: Pos,
    /// Enemy pieces removed by this move
    pub captured: Vec<Pos>,
    pub next_side: Side,
    pub phase: Phase,
    pub winner: Option<Side>,
}

/// Remaining placement allotment per side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingPieces {
    #[serde(rename = "A")]
    pub a: u8,
    #[serde(rename = "B")]
    pub b: u8,
}

/// Serializable view of the whole game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Rows top to bottom, `None` for empty cells
    pub board: Vec<Vec<Option<Side>>>,
    pub turn: Side,
    pub phase: Phase,
    pub placements_this_turn: u8,
    pub pieces: RemainingPieces,
    pub winner: Option<Side>,
    pub win_reason: Option<WinReason>,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Seega rules engine
///
/// Owns the board and turn bookkeeping. All validation happens before any
/// mutation, so a rejected call leaves the state untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    phase: Phase,

    /// Side to act
    current_side: Side,
    placements_this_turn: u8,

    /// Placement allotment, indexed by side
    remaining: [u8; 2],

    /// Set once, never cleared
    outcome: Option<(Side, WinReason)>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, placement phase, side A to act
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            phase: Phase::Placement,
            current_side: Side::A,
            placements_this_turn: 0,
            remaining: [PIECES_PER_SIDE; 2],
            outcome: None,
        }
    }

    /// Start the movement phase from an arbitrary position
    pub fn from_position(board: Board, to_move: Side) -> Self {
        let mut state = Self {
            board,
            phase: Phase::Movement,
            current_side: to_move,
            placements_this_turn: 0,
            remaining: [0; 2],
            outcome: None,
        };
        state.outcome = state.detect_winner();
        state
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side to act
    pub fn current_side(&self) -> Side {
        self.current_side
    }

    pub fn placements_this_turn(&self) -> u8 {
        self.placements_this_turn
    }

    /// Pieces a side still has to place
    pub fn remaining(&self, side: Side) -> u8 {
        self.remaining[side.index()]
    }

    pub fn winner(&self) -> Option<Side> {
        self.outcome.map(|(side, _)| side)
    }

    pub fn win_reason(&self) -> Option<WinReason> {
        self.outcome.map(|(_, reason)| reason)
    }

    /// Winner and how the game was decided
    pub fn outcome(&self) -> Option<(Side, WinReason)> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self
                .board
                .rows()
                .iter()
                .map(|row| row.iter().map(Cell::side).collect())
                .collect(),
            turn: self.current_side,
            phase: self.phase,
            placements_this_turn: self.placements_this_turn,
            pieces: RemainingPieces {
                a: self.remaining(Side::A),
                b: self.remaining(Side::B),
            },
            winner: self.winner(),
            win_reason: self.win_reason(),
        }
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    /// Place a piece during the placement phase
    pub fn place(&mut self, side: Side, pos: Pos) -> Result<PlaceOutcome, RuleError> {
        self.check_can_act(side)?;
        if self.phase != Phase::Placement {
            return Err(RuleError::WrongPhase);
        }
        if pos == CENTER || self.board.get(pos) != Some(Cell::Empty) {
            return Err(RuleError::InvalidPosition);
        }
        if self.remaining(side) == 0 {
            return Err(RuleError::AllotmentExhausted);
        }

        self.board.set(pos, Cell::Piece(side));
        self.remaining[side.index()] -= 1;
        self.placements_this_turn += 1;

        if self.placements_this_turn == PLACEMENTS_PER_TURN {
            self.current_side = side.opponent();
            self.placements_this_turn = 0;
        }

        if self.remaining == [0, 0] {
            self.phase = Phase::Movement;
            // The last placement can already complete a line
            self.outcome = self.detect_winner();
        }

        Ok(PlaceOutcome {
            side,
            pos,
            next_side: self.current_side,
            phase: self.phase,
            winner: self.winner(),
        })
    }

    /// Cells a piece may currently be placed on
    pub fn legal_placements(&self) -> Vec<Pos> {
        if self.phase != Phase::Placement || self.is_finished() {
            return Vec::new();
        }
        self.board
            .cells()
            .filter(|(pos, cell)| cell.is_empty() && *pos != CENTER)
            .map(|(pos, _)| pos)
            .collect()
    }

    // ========================================================================
    // MOVEMENT
    // ========================================================================

    /// Slide a piece one orthogonal step during the movement phase
    pub fn move_piece(&mut self, side: Side, from: Pos, to: Pos) -> Result<MoveOutcome, RuleError> {
        self.check_can_act(side)?;
        if self.phase != Phase::Movement {
            return Err(RuleError::WrongPhase);
        }
        if !from.is_valid() || !to.is_valid() {
            return Err(RuleError::InvalidPosition);
        }
        if self.board.get(from) != Some(Cell::Piece(side)) {
            return Err(RuleError::NotOwner);
        }
        if self.board.get(to) != Some(Cell::Empty) {
            return Err(RuleError::DestinationOccupied);
        }
        if from.manhattan(to) != 1 {
            return Err(RuleError::IllegalDistance);
        }

        self.board.set(to, Cell::Piece(side));
        self.board.set(from, Cell::Empty);

        let captured = self.resolve_captures(to, side);
        self.outcome = self.detect_winner();

        // A capture grants another move; a decided game keeps the turn where it is
        if captured.is_empty() && self.outcome.is_none() {
            self.current_side = side.opponent();
        }

        Ok(MoveOutcome {
            side,
            from,
            to,
            captured,
            next_side: self.current_side,
            phase: self.phase,
            winner: self.winner(),
        })
    }

    /// All (from, to) single steps available to a side
    pub fn legal_moves(&self, side: Side) -> Vec<(Pos, Pos)> {
        if self.phase != Phase::Movement || self.is_finished() {
            return Vec::new();
        }
        self.board
            .cells()
            .filter(|(_, cell)| *cell == Cell::Piece(side))
            .flat_map(|(from, _)| {
                from.neighbors()
                    .filter(move |to| self.board.get(*to) == Some(Cell::Empty))
                    .map(move |to| (from, to))
            })
            .collect()
    }

    // ========================================================================
    // RESIGNATION
    // ========================================================================

    /// Concede the game, returning the winning side
    pub fn resign(&mut self, side: Side) -> Result<Side, RuleError> {
        if self.is_finished() {
            return Err(RuleError::GameOver);
        }
        let winner = side.opponent();
        self.outcome = Some((winner, WinReason::Resignation));
        Ok(winner)
    }

    // ========================================================================
    // CAPTURE AND WIN DETECTION
    // ========================================================================

    /// Remove every enemy piece sandwiched between `pos` and another piece of `side`
    fn resolve_captures(&mut self, pos: Pos, side: Side) -> Vec<Pos> {
        let enemy = Cell::Piece(side.opponent());
        let own = Cell::Piece(side);
        let mut captured = Vec::new();

        for dir in DIRECTIONS {
            let adjacent = pos.offset(dir, 1);
            let beyond = pos.offset(dir, 2);
            if self.board.get(adjacent) == Some(enemy) && self.board.get(beyond) == Some(own) {
                self.board.set(adjacent, Cell::Empty);
                captured.push(adjacent);
            }
        }

        captured
    }

    /// Elimination first, then full rows, then full columns
    fn detect_winner(&self) -> Option<(Side, WinReason)> {
        if self.phase != Phase::Movement {
            return None;
        }

        for side in [Side::A, Side::B] {
            if self.board.count(side) == 0 {
                return Some((side.opponent(), WinReason::Elimination));
            }
        }

        let rows = self.board.rows();
        for row in rows {
            if let Some(side) = line_owner(row.iter().copied()) {
                return Some((side, WinReason::Line));
            }
        }
        for col in 0..rows.len() {
            if let Some(side) = line_owner(rows.iter().map(|row| row[col])) {
                return Some((side, WinReason::Line));
            }
        }

        None
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn check_can_act(&self, side: Side) -> Result<(), RuleError> {
        if side != self.current_side {
            return Err(RuleError::NotYourTurn);
        }
        if self.is_finished() {
            return Err(RuleError::GameOver);
        }
        Ok(())
    }
}

// ============================================================================
// LINE HELPERS
// ============================================================================

/// Side owning every cell of a line, if any
fn line_owner(mut cells: impl Iterator<Item = Cell>) -> Option<Side> {
    let first = cells.next()?.side()?;
    cells.all(|c| c == Cell::Piece(first)).then_some(first)
}

// ============================================================================
// TESTS
// ============================================================================
