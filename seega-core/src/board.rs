//! Square board geometry with (row, col) coordinates

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Side;

/// Board width and height
pub const BOARD_SIZE: i8 = 5;

/// Pieces each side places during the placement phase
pub const PIECES_PER_SIDE: u8 = 12;

/// Center cell, never occupiable by placement
pub const CENTER: Pos = Pos::new(2, 2);

/// Orthogonal direction vectors (dr, dc)
/// Index: 0=N, 1=S, 2=W, 3=E
pub const DIRECTIONS: [(i8, i8); 4] = [
    (-1, 0), // N
    (1, 0),  // S
    (0, -1), // W
    (0, 1),  // E
];

/// Board coordinates
///
/// Signed so that out-of-range caller input is representable and can be
/// rejected instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: i8,
    pub col: i8,
}

impl Pos {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this position is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// Manhattan distance between two positions
    pub fn manhattan(&self, other: Pos) -> u8 {
        let dr = (self.row as i16 - other.row as i16).unsigned_abs();
        let dc = (self.col as i16 - other.col as i16).unsigned_abs();
        (dr + dc) as u8
    }

    /// Position `steps` cells away along a direction vector
    pub fn offset(&self, (dr, dc): (i8, i8), steps: i8) -> Pos {
        Pos::new(
            self.row.saturating_add(dr.saturating_mul(steps)),
            self.col.saturating_add(dc.saturating_mul(steps)),
        )
    }

    /// Orthogonal neighbors that lie on the board
    pub fn neighbors(self) -> impl Iterator<Item = Pos> {
        DIRECTIONS
            .into_iter()
            .map(move |dir| self.offset(dir, 1))
            .filter(Pos::is_valid)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.row, self.col)
    }
}

/// Contents of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Piece(Side),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Piece(side) => Some(*side),
        }
    }
}

/// 5x5 grid (copy to snapshot)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get cell at position, `None` when off the board
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        if !pos.is_valid() {
            return None;
        }
        Some(self.cells[pos.row as usize][pos.col as usize])
    }

    /// Overwrite the cell at an on-board position
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        debug_assert!(pos.is_valid(), "set called with off-board position {pos:?}");
        self.cells[pos.row as usize][pos.col as usize] = cell;
    }

    /// Iterate every (position, cell) pair in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, &cell)| (Pos::new(r as i8, c as i8), cell))
        })
    }

    /// Number of pieces a side has on the board
    pub fn count(&self, side: Side) -> usize {
        self.cells()
            .filter(|(_, cell)| *cell == Cell::Piece(side))
            .count()
    }

    /// Rows as arrays, top to bottom
    pub fn rows(&self) -> &[[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize] {
        &self.cells
    }

    /// Positions that held a piece here and are empty in `after`
    pub fn vacated(&self, after: &Board) -> Vec<Pos> {
        self.cells()
            .filter(|(pos, cell)| {
                !cell.is_empty() && after.get(*pos).is_some_and(|c| c.is_empty())
            })
            .map(|(pos, _)| pos)
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {col}")?;
        }
        writeln!(f)?;
        for (r, row) in self.cells.iter().enumerate() {
            write!(f, "{r}")?;
            for cell in row {
                match cell {
                    Cell::Empty => write!(f, " .")?,
                    Cell::Piece(side) => write!(f, " {side}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
