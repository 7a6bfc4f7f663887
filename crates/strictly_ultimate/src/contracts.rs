//! Move preconditions.
//!
//! Each legality rule is its own precondition. [`LegalMove`] composes
//! them in a fixed order so a rejected move always reports the first
//! rule it breaks.

use super::action::{Move, RejectReason};
use super::{Coord, GameState};
use tracing::{instrument, warn};

/// Precondition: the game must still be in progress.
pub struct GameNotOver;

impl GameNotOver {
    /// Checks the precondition.
    #[instrument(skip(state))]
    pub fn check(state: &GameState) -> Result<(), RejectReason> {
        if state.outcome().is_terminal() {
            Err(RejectReason::GameAlreadyOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: it must be the player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Checks the precondition.
    #[instrument(skip(state))]
    pub fn check(mov: &Move, state: &GameState) -> Result<(), RejectReason> {
        if mov.player != state.current_player() {
            Err(RejectReason::WrongPlayer {
                expected: state.current_player(),
                attempted: mov.player,
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: the target cell must be on the board.
pub struct OnBoard;

impl OnBoard {
    /// Checks the precondition, yielding the validated coordinate.
    #[instrument]
    pub fn check(mov: &Move) -> Result<Coord, RejectReason> {
        mov.coord().ok_or(RejectReason::OutOfBounds {
            row: mov.row,
            col: mov.col,
        })
    }
}

/// Precondition: the target cell must be empty.
pub struct CellIsEmpty;

impl CellIsEmpty {
    /// Checks the precondition.
    #[instrument(skip(state))]
    pub fn check(coord: Coord, state: &GameState) -> Result<(), RejectReason> {
        if state.board().is_empty(coord) {
            Ok(())
        } else {
            Err(RejectReason::CellOccupied(coord))
        }
    }
}

/// Precondition: the target sub-board must still be open.
pub struct SubBoardIsOpen;

impl SubBoardIsOpen {
    /// Checks the precondition.
    #[instrument(skip(state))]
    pub fn check(coord: Coord, state: &GameState) -> Result<(), RejectReason> {
        let sub_board = coord.sub_board();
        if state.sub_status(sub_board).is_open() {
            Ok(())
        } else {
            Err(RejectReason::SubBoardClosed(sub_board))
        }
    }
}

/// Precondition: the target must lie in the active sub-board, if one is set.
pub struct InActiveSubBoard;

impl InActiveSubBoard {
    /// Checks the precondition.
    #[instrument(skip(state))]
    pub fn check(coord: Coord, state: &GameState) -> Result<(), RejectReason> {
        match state.active_sub_board() {
            Some(required) if required != coord.sub_board() => Err(RejectReason::WrongSubBoard {
                required,
                attempted: coord.sub_board(),
            }),
            _ => Ok(()),
        }
    }
}

/// Composite precondition: all six legality rules, in order.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    ///
    /// Returns the validated target cell.
    #[instrument(skip(state))]
    pub fn check(mov: &Move, state: &GameState) -> Result<Coord, RejectReason> {
        let result = Self::check_in_order(mov, state);
        if let Err(reason) = &result {
            warn!(kind = %reason.kind(), %reason, "Move rejected");
        }
        result
    }

    fn check_in_order(mov: &Move, state: &GameState) -> Result<Coord, RejectReason> {
        GameNotOver::check(state)?;
        PlayersTurn::check(mov, state)?;
        let coord = OnBoard::check(mov)?;
        CellIsEmpty::check(coord, state)?;
        SubBoardIsOpen::check(coord, state)?;
        InActiveSubBoard::check(coord, state)?;
        Ok(coord)
    }
}
