//! The rule engine: legality, placement and termination.
//!
//! Every function here is pure. The same [`apply_move`] drives live play
//! and replay reconstruction, which is what keeps the two from diverging.

use super::action::{Move, RejectReason};
use super::contracts::LegalMove;
use super::rules::{macro_outcome, sub_board_status};
use super::{Board, Cell, Coord, GameState, Outcome, Player, SubBoardStatus};
use tracing::{debug, info, instrument};

/// The canonical start state: empty board, X to move, no constraint.
#[instrument]
pub fn initial_state() -> GameState {
    GameState {
        board: Board::new(),
        sub_status: [SubBoardStatus::Open; 9],
        current_player: Player::X,
        active_sub_board: None,
        outcome: Outcome::InProgress,
        last_move: None,
    }
}

/// Validates `mov` against `state` and returns the successor state.
///
/// The input is never modified. On rejection the reason names the first
/// failing legality check.
#[instrument(skip(state), fields(player = %mov.player, row = mov.row, col = mov.col))]
pub fn apply_move(state: &GameState, mov: Move) -> Result<GameState, RejectReason> {
    let coord = LegalMove::check(&mov, state)?;
    let next = place_mark(state, coord);

    if next.outcome.is_terminal() {
        info!(outcome = %next.outcome, "Game finished");
    }

    Ok(next)
}

/// Places the current player's mark at `coord` and recomputes everything
/// that depends on it.
///
/// Performs no legality checks; callers must have validated the move.
#[instrument(skip(state))]
pub fn place_mark(state: &GameState, coord: Coord) -> GameState {
    let mut next = state.clone();
    let mover = state.current_player;
    next.board.set(coord, Cell::Occupied(mover));
    next.last_move = Some(coord);

    let sub_board = coord.sub_board();
    if next.sub_status[sub_board.to_index()].is_open() {
        let status = sub_board_status(&next.board, sub_board);
        if status != SubBoardStatus::Open {
            debug!(%sub_board, ?status, "Sub-board closed");
        }
        next.sub_status[sub_board.to_index()] = status;
    }

    next.outcome = macro_outcome(&next.sub_status);

    let target = coord.local();
    next.active_sub_board = if next.sub_status[target.to_index()].is_open() {
        Some(target)
    } else {
        None
    };

    if !next.outcome.is_terminal() {
        next.current_player = mover.opponent();
    }

    next
}

/// Every cell the current player may legally play, in row-major order.
#[instrument(skip(state))]
pub fn legal_moves(state: &GameState) -> Vec<Coord> {
    if state.outcome.is_terminal() {
        return Vec::new();
    }
    Coord::all()
        .filter(|coord| {
            state.board.is_empty(*coord)
                && state.sub_status(coord.sub_board()).is_open()
                && state
                    .active_sub_board
                    .is_none_or(|active| active == coord.sub_board())
        })
        .collect()
}

impl GameState {
    /// Convenience for [`apply_move`].
    pub fn apply(&self, mov: Move) -> Result<GameState, RejectReason> {
        apply_move(self, mov)
    }
}

impl Default for GameState {
    fn default() -> Self {
        initial_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_initial_state() {
        let state = initial_state();
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.active_sub_board(), None);
        assert_eq!(state.outcome(), Outcome::InProgress);
        assert_eq!(state.board().occupied(), 0);
        assert_eq!(legal_moves(&state).len(), 81);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let state = initial_state();
        let next = apply_move(&state, Move::new(Player::X, 4, 4)).unwrap();
        assert_eq!(state, initial_state());
        assert_ne!(state, next);
    }

    #[test]
    fn test_move_sends_opponent_to_matching_sub_board() {
        let state = initial_state();
        let next = apply_move(&state, Move::new(Player::X, 2, 6)).unwrap();
        assert_eq!(next.active_sub_board(), Some(Position::BottomLeft));
        assert_eq!(next.last_move(), Coord::new(2, 6));

        let moves = legal_moves(&next);
        assert_eq!(moves.len(), 9);
        assert!(moves.iter().all(|c| c.sub_board() == Position::BottomLeft));
    }

    #[test]
    fn test_terminal_state_has_no_legal_moves() {
        let mut state = initial_state();
        state.outcome = Outcome::Draw;
        assert!(legal_moves(&state).is_empty());
    }
}
