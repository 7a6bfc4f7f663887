//! History consistency invariant: the history accounts for every mark.

use super::super::Game;
use super::Invariant;

/// Invariant: History length matches occupied cells.
///
/// Every non-empty cell was set by exactly one recorded move, and the
/// state's last move is the history's last entry.
pub struct HistoryConsistentInvariant;

impl Invariant<Game> for HistoryConsistentInvariant {
    fn holds(game: &Game) -> bool {
        let history = game.history();
        if game.state().board().occupied() != history.len() {
            return false;
        }

        let last_logged = history.moves().last().and_then(|mov| mov.coord());
        game.state().last_move() == last_logged
    }

    fn description() -> &'static str {
        "History length matches occupied cells"
    }
}
