//! Sub-board status invariant: statuses agree with the cells.

use super::super::rules::{macro_outcome, sub_board_status};
use super::super::{Game, Position};
use super::Invariant;

/// Invariant: every sub-board status, the outcome and the active
/// sub-board agree with a fresh evaluation of the board.
pub struct SubBoardStatusInvariant;

impl Invariant<Game> for SubBoardStatusInvariant {
    fn holds(game: &Game) -> bool {
        let state = game.state();

        let statuses_agree = Position::ALL.iter().all(|pos| {
            state.sub_status(*pos) == sub_board_status(state.board(), *pos)
        });

        let active_is_open = state
            .active_sub_board()
            .is_none_or(|active| state.sub_status(active).is_open());

        statuses_agree && active_is_open && macro_outcome(state.sub_statuses()) == state.outcome()
    }

    fn description() -> &'static str {
        "Sub-board statuses, outcome and active sub-board agree with the board"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, MoveHistory, Player, SubBoardStatus};

    #[test]
    fn test_played_game_holds() {
        let mut game = Game::new();
        game.play(Move::new(Player::X, 4, 4)).unwrap();
        assert!(SubBoardStatusInvariant::holds(&game));
    }

    #[test]
    fn test_phantom_closed_sub_board_violates() {
        let game = Game::new();
        let mut state = game.state().clone();
        state.sub_status[Position::Center.to_index()] = SubBoardStatus::WonBy(Player::X);

        let corrupted = Game::from_parts(state, MoveHistory::new());
        assert!(!SubBoardStatusInvariant::holds(&corrupted));
    }
}
