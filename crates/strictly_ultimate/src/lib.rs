//! Ultimate tic-tac-toe rules and deterministic move replay.
//!
//! A 3x3 grid of 3x3 sub-boards where the cell you pick decides which
//! sub-board your opponent must play in next.
//!
//! # Architecture
//!
//! - **Rules**: one 8-line check shared by sub-boards and the macro-board
//! - **Engine**: pure `apply_move` with ordered legality checks
//! - **Game**: live state plus its append-only [`MoveHistory`]
//! - **Replay**: [`state_at`], validated timelines and the [`ReplayCursor`]
//!   state machine
//! - **Wire**: mapping to and from the authoritative service's payloads
//!
//! # Example
//!
//! ```
//! use strictly_ultimate::{Game, Move, Player, Position, state_at};
//!
//! let mut game = Game::new();
//! game.play(Move::new(Player::X, 4, 4)).unwrap();
//! assert_eq!(game.state().active_sub_board(), Some(Position::Center));
//!
//! let replayed = state_at(game.history(), 0).unwrap();
//! assert_eq!(&replayed, game.state());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod engine;
mod game;
mod position;
mod replay;
mod types;

pub mod invariants;
pub mod rules;
pub mod wire;

pub use action::{Move, RejectKind, RejectReason};
pub use contracts::{
    CellIsEmpty, GameNotOver, InActiveSubBoard, LegalMove, OnBoard, PlayersTurn, SubBoardIsOpen,
};
pub use engine::{apply_move, initial_state, legal_moves, place_mark};
pub use game::{Game, MoveHistory};
pub use position::{Coord, OffBoard, Position};
pub use replay::{
    DEFAULT_INTERVAL_MS, Direction, PlaybackPhase, Replay, ReplayCursor, ReplayError, state_at,
};
pub use types::{Board, Cell, GameState, Outcome, Player, SubBoardStatus};
