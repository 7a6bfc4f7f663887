//! First-class action types for ultimate tic-tac-toe.
//!
//! Moves are domain events, not side effects. They carry raw coordinates
//! so that an out-of-range request is representable and can be rejected
//! with a precise reason.

use super::{Coord, Player, Position};
use serde::{Deserialize, Serialize};

/// A move: a player placing their mark at a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// Board row, expected in `[0, 9)`.
    pub row: usize,
    /// Board column, expected in `[0, 9)`.
    pub col: usize,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: Player, row: usize, col: usize) -> Self {
        Self { player, row, col }
    }

    /// Creates a move at an already-validated coordinate.
    pub fn at(player: Player, coord: Coord) -> Self {
        Self::new(player, coord.row(), coord.col())
    }

    /// Returns the target cell, or `None` if out of bounds.
    pub fn coord(&self) -> Option<Coord> {
        Coord::new(self.row, self.col)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> ({}, {})", self.player, self.row, self.col)
    }
}

/// Why a move was rejected.
///
/// Variants are listed in the order the rule engine checks them; a
/// rejected move always reports the first failing check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum RejectReason {
    /// The game is already over.
    #[display("Game is already over")]
    GameAlreadyOver,

    /// It's not this player's turn.
    #[display("It's {}'s turn, not {}'s", expected, attempted)]
    WrongPlayer {
        /// The player to move.
        expected: Player,
        /// The player who tried to move.
        attempted: Player,
    },

    /// Row or column outside `[0, 9)`.
    #[display("Cell ({}, {}) is off the board", row, col)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The cell is already occupied.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Coord),

    /// The cell's sub-board is won or drawn.
    #[display("Sub-board {} is closed", _0)]
    SubBoardClosed(Position),

    /// The move is outside the sub-board the mover was sent to.
    #[display("Must play in sub-board {}, not {}", required, attempted)]
    WrongSubBoard {
        /// The active sub-board.
        required: Position,
        /// The sub-board containing the requested cell.
        attempted: Position,
    },

    /// The authoritative service rejected the move with a message that
    /// maps onto no local check.
    #[display("Rejected by server: {}", _0)]
    Remote(String),
}

impl std::error::Error for RejectReason {}

impl RejectReason {
    /// Diagnostic discriminant of this rejection.
    pub fn kind(&self) -> RejectKind {
        match self {
            RejectReason::GameAlreadyOver => RejectKind::GameAlreadyOver,
            RejectReason::WrongPlayer { .. } => RejectKind::WrongPlayer,
            RejectReason::OutOfBounds { .. } => RejectKind::OutOfBounds,
            RejectReason::CellOccupied(_) => RejectKind::CellOccupied,
            RejectReason::SubBoardClosed(_) => RejectKind::SubBoardClosed,
            RejectReason::WrongSubBoard { .. } => RejectKind::WrongSubBoard,
            RejectReason::Remote(_) => RejectKind::Remote,
        }
    }
}

/// Field-less mirror of [`RejectReason`] for logging and matching.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RejectKind {
    /// See [`RejectReason::GameAlreadyOver`].
    GameAlreadyOver,
    /// See [`RejectReason::WrongPlayer`].
    WrongPlayer,
    /// See [`RejectReason::OutOfBounds`].
    OutOfBounds,
    /// See [`RejectReason::CellOccupied`].
    CellOccupied,
    /// See [`RejectReason::SubBoardClosed`].
    SubBoardClosed,
    /// See [`RejectReason::WrongSubBoard`].
    WrongSubBoard,
    /// See [`RejectReason::Remote`].
    Remote,
}
