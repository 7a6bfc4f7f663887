//! Win detection shared by sub-boards and the macro-board.

use super::super::{Cell, Player, Position, SubBoardStatus};
use tracing::instrument;

/// The 8 winning lines of a 3x3 grid.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Anything that can sit on a 3x3 grid and count toward a line.
pub trait LineMark: Copy + std::fmt::Debug {
    /// The player this entry counts for, if any.
    fn owner(self) -> Option<Player>;
}

impl LineMark for Cell {
    fn owner(self) -> Option<Player> {
        match self {
            Cell::Occupied(player) => Some(player),
            Cell::Empty => None,
        }
    }
}

impl LineMark for SubBoardStatus {
    fn owner(self) -> Option<Player> {
        match self {
            SubBoardStatus::WonBy(player) => Some(player),
            SubBoardStatus::Open | SubBoardStatus::Drawn => None,
        }
    }
}

/// True iff all three entries denote `player`.
#[instrument(level = "trace")]
pub fn check_line<T: LineMark>(triple: [T; 3], player: Player) -> bool {
    triple.iter().all(|mark| mark.owner() == Some(player))
}

/// Checks a 3x3 grid for a completed line.
///
/// Returns `Some(player)` if the player has three in a row,
/// `None` otherwise.
#[instrument(level = "trace")]
pub fn line_winner<T: LineMark>(grid: &[T; 9]) -> Option<Player> {
    for line in LINES {
        let triple = line.map(|pos| grid[pos.to_index()]);
        for player in [Player::X, Player::O] {
            if check_line(triple, player) {
                return Some(player);
            }
        }
    }

    None
}
