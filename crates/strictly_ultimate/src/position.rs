//! Positions on the 3x3 grids and coordinates on the 9x9 board.
//!
//! The same [`Position`] enum names a cell inside a sub-board and a
//! sub-board inside the macro-board. That shared vocabulary is what lets
//! one line table serve both granularities.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A position on a 3x3 grid (0-8, row-major).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

impl Position {
    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Converts position to grid index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates position from grid index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Creates position from a row and column in `[0, 3)`.
    pub fn from_row_col(row: usize, col: usize) -> Option<Self> {
        if row < 3 && col < 3 {
            Self::from_index(row * 3 + col)
        } else {
            None
        }
    }

    /// Row of this position (0-2).
    pub fn row(self) -> usize {
        self.to_index() / 3
    }

    /// Column of this position (0-2).
    pub fn col(self) -> usize {
        self.to_index() % 3
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A cell on the 9x9 board, always in bounds.
///
/// Raw, possibly out-of-range coordinates travel in
/// [`Move`](crate::Move); a `Coord` only exists once bounds are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[usize; 2]", into = "[usize; 2]")]
pub struct Coord {
    row: usize,
    col: usize,
}

impl Coord {
    /// Creates a coordinate, or `None` if either axis is outside `[0, 9)`.
    #[instrument]
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < 9 && col < 9 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Builds the coordinate of `cell` inside `sub_board`.
    pub fn from_parts(sub_board: Position, cell: Position) -> Self {
        Self {
            row: sub_board.row() * 3 + cell.row(),
            col: sub_board.col() * 3 + cell.col(),
        }
    }

    /// Board row (0-8).
    pub fn row(&self) -> usize {
        self.row
    }

    /// Board column (0-8).
    pub fn col(&self) -> usize {
        self.col
    }

    /// The sub-board containing this cell.
    pub fn sub_board(&self) -> Position {
        Position::ALL[(self.row / 3) * 3 + self.col / 3]
    }

    /// This cell's position within its sub-board.
    ///
    /// This is also the sub-board the opponent is sent to.
    pub fn local(&self) -> Position {
        Position::ALL[(self.row % 3) * 3 + self.col % 3]
    }

    /// All 81 coordinates in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..9).flat_map(|row| (0..9).map(move |col| Coord { row, col }))
    }
}

/// A `[row, col]` pair outside the 9x9 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Cell ({}, {}) is off the board", row, col)]
pub struct OffBoard {
    /// Requested row.
    pub row: usize,
    /// Requested column.
    pub col: usize,
}

impl TryFrom<[usize; 2]> for Coord {
    type Error = OffBoard;

    fn try_from([row, col]: [usize; 2]) -> Result<Self, Self::Error> {
        Coord::new(row, col).ok_or(OffBoard { row, col })
    }
}

impl From<Coord> for [usize; 2] {
    fn from(coord: Coord) -> Self {
        [coord.row, coord.col]
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
