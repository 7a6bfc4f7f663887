//! Monotonic board invariant: cells never change once set.

use super::super::{Board, Cell, Game};
use super::Invariant;

/// Invariant: Board cells are monotonic (never overwritten).
///
/// Once a cell transitions from Empty to Occupied, it never changes.
/// This is verified by replaying the move history onto an empty board
/// and comparing.
pub struct MonotonicBoardInvariant;

impl Invariant<Game> for MonotonicBoardInvariant {
    fn holds(game: &Game) -> bool {
        let mut reconstructed = Board::new();

        for mov in game.history() {
            let Some(coord) = mov.coord() else {
                return false;
            };

            // Cell must be empty before placing
            if !reconstructed.is_empty(coord) {
                return false;
            }

            reconstructed.set(coord, Cell::Occupied(mov.player));
        }

        reconstructed == *game.state().board()
    }

    fn description() -> &'static str {
        "Board cells are monotonic (never overwritten)"
    }
}
