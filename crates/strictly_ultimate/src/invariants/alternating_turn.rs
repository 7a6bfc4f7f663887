//! Alternating turn invariant: players alternate X, O, X, O, ...

use super::super::{Game, Player};
use super::Invariant;

/// Invariant: Players alternate turns.
///
/// Move history must show X, O, X, O, ... and the player to move must be
/// the next in that pattern, except that a finished game keeps the last
/// mover as current player.
pub struct AlternatingTurnInvariant;

impl Invariant<Game> for AlternatingTurnInvariant {
    fn holds(game: &Game) -> bool {
        let history = game.history().moves();

        let Some(first) = history.first() else {
            return game.state().current_player() == Player::X;
        };

        // First move must be X
        if first.player != Player::X {
            return false;
        }

        if history.windows(2).any(|pair| pair[0].player == pair[1].player) {
            return false;
        }

        let last_mover = history[history.len() - 1].player;
        let expected = if game.state().outcome().is_terminal() {
            last_mover
        } else {
            last_mover.opponent()
        };

        game.state().current_player() == expected
    }

    fn description() -> &'static str {
        "Players alternate turns (X, O, X, O, ...)"
    }
}
