//! Sub-board status and game outcome evaluation.

use super::super::{Board, Cell, Outcome, Position, SubBoardStatus};
use super::win::line_winner;
use tracing::instrument;

/// Checks if a 3x3 grid of cells is full.
pub fn is_full(cells: &[Cell; 9]) -> bool {
    cells.iter().all(|c| *c != Cell::Empty)
}

/// Recomputes the status of one sub-board from the board.
///
/// A line wins even on a full sub-board; only a full sub-board without
/// a line is drawn.
#[instrument(skip(board))]
pub fn sub_board_status(board: &Board, sub_board: Position) -> SubBoardStatus {
    let cells = board.sub_board(sub_board);
    if let Some(winner) = line_winner(&cells) {
        SubBoardStatus::WonBy(winner)
    } else if is_full(&cells) {
        SubBoardStatus::Drawn
    } else {
        SubBoardStatus::Open
    }
}

/// Evaluates the macro-board.
///
/// A line of sub-boards won by one player wins the game; otherwise the
/// game is drawn once no sub-board is open.
#[instrument]
pub fn macro_outcome(statuses: &[SubBoardStatus; 9]) -> Outcome {
    if let Some(winner) = line_winner(statuses) {
        Outcome::Won(winner)
    } else if statuses.iter().all(|s| !s.is_open()) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}
