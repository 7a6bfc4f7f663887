//! Live game: the current state plus its append-only move history.

use super::action::{Move, RejectReason};
use super::engine::{apply_move, initial_state};
use super::invariants::{InvariantSet, UltimateInvariants};
use super::GameState;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

/// Ordered log of accepted moves; index 0 is the first move.
///
/// The log only grows. A restart starts a new, independent history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if no move was recorded.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns the move at `index`.
    pub fn get(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    /// Returns all moves.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Iterates over the moves in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub(crate) fn push(&mut self, mov: Move) {
        self.moves.push(mov);
    }
}

/// Builds a history from a log received from elsewhere.
///
/// Nothing is validated here; replay validates when it folds the log.
impl From<Vec<Move>> for MoveHistory {
    fn from(moves: Vec<Move>) -> Self {
        Self { moves }
    }
}

impl FromIterator<Move> for MoveHistory {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MoveHistory {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

/// A game being played: authoritative state plus the moves that built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    state: GameState,
    history: MoveHistory,
}

impl Game {
    /// Creates a new game.
    #[instrument]
    pub fn new() -> Self {
        Self {
            state: initial_state(),
            history: MoveHistory::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(state: GameState, history: MoveHistory) -> Self {
        Self { state, history }
    }

    /// Returns the current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the move history.
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Applies a move and records it.
    ///
    /// On rejection the game is left untouched. In debug builds the
    /// invariant set is checked after every accepted move.
    #[instrument(skip(self), fields(moves = self.history.len()))]
    pub fn play(&mut self, mov: Move) -> Result<&GameState, RejectReason> {
        let next = apply_move(&self.state, mov)?;
        self.state = next;
        self.history.push(mov);

        if cfg!(debug_assertions) {
            self.check_postconditions();
        }

        info!(%mov, outcome = %self.state.outcome(), "Move accepted");
        Ok(&self.state)
    }

    fn check_postconditions(&self) {
        if let Err(violations) = UltimateInvariants::check_all(self) {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            error!(%descriptions, "Postcondition failed");
            debug_assert!(false, "Postcondition failed: {}", descriptions);
        }
    }

    /// Discards this game and returns a fresh one with a new history.
    #[instrument(skip(self))]
    pub fn restart(self) -> Game {
        Game::new()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
