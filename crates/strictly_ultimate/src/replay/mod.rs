//! Deterministic reconstruction of past states from a move history.
//!
//! [`state_at`] is the reference fold. [`Replay`] performs the same fold
//! once up front and keeps every intermediate state so a cursor can jump
//! around without refolding.

mod cursor;
mod error;

pub use cursor::{DEFAULT_INTERVAL_MS, Direction, PlaybackPhase, ReplayCursor};
pub use error::ReplayError;

use crate::engine::{apply_move, initial_state};
use crate::{GameState, MoveHistory};
use tracing::{debug, error, instrument};

/// Derives the state after applying moves `0..=index`.
///
/// `index = -1` is the empty board. The history is re-validated move by
/// move; a rejection is reported as [`ReplayError::CorruptHistory`].
#[instrument(skip(history), fields(len = history.len()))]
pub fn state_at(history: &MoveHistory, index: isize) -> Result<GameState, ReplayError> {
    check_range(history.len(), index)?;

    let mut state = initial_state();
    for (i, mov) in history.iter().enumerate().take(prefix_len(index)) {
        state = apply_move(&state, *mov).map_err(|reason| {
            error!(index = i, %reason, "Logged move rejected during replay");
            ReplayError::CorruptHistory { index: i, reason }
        })?;
    }

    Ok(state)
}

fn check_range(len: usize, index: isize) -> Result<(), ReplayError> {
    if index < -1 || index >= len as isize {
        return Err(ReplayError::IndexOutOfRange { index, len });
    }
    Ok(())
}

/// Number of moves applied at `index`.
fn prefix_len(index: isize) -> usize {
    (index + 1).max(0) as usize
}

/// A validated replay timeline.
///
/// Built once from a history; read-only afterwards. If the history is
/// corrupt the timeline ends at the last valid state and remembers why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    history: MoveHistory,
    /// `snapshots[k + 1]` is the state after move `k`.
    snapshots: Vec<GameState>,
    corruption: Option<ReplayError>,
}

impl Replay {
    /// Folds `history` into a timeline.
    #[instrument(skip(history), fields(len = history.len()))]
    pub fn new(history: MoveHistory) -> Self {
        let mut snapshots = Vec::with_capacity(history.len() + 1);
        let mut corruption = None;
        let mut state = initial_state();
        snapshots.push(state.clone());

        for (index, mov) in history.iter().enumerate() {
            match apply_move(&state, *mov) {
                Ok(next) => {
                    snapshots.push(next.clone());
                    state = next;
                }
                Err(reason) => {
                    error!(index, %reason, "History is corrupt; replay stops here");
                    corruption = Some(ReplayError::CorruptHistory { index, reason });
                    break;
                }
            }
        }

        debug!(valid = snapshots.len() - 1, "Replay timeline built");
        Self {
            history,
            snapshots,
            corruption,
        }
    }

    /// The underlying history.
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Number of moves in the history.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns true if the history holds no moves.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// The highest index that can be shown (`-1` for an empty or
    /// immediately corrupt history).
    pub fn last_index(&self) -> isize {
        self.snapshots.len() as isize - 2
    }

    /// Why the timeline ends early, if it does.
    pub fn corruption(&self) -> Option<&ReplayError> {
        self.corruption.as_ref()
    }

    /// The state at `index`, with the same contract as [`state_at`].
    pub fn state(&self, index: isize) -> Result<&GameState, ReplayError> {
        check_range(self.len(), index)?;
        match self.snapshots.get(prefix_len(index)) {
            Some(state) => Ok(state),
            None => Err(self
                .corruption
                .clone()
                .unwrap_or(ReplayError::IndexOutOfRange {
                    index,
                    len: self.len(),
                })),
        }
    }

    /// The final valid state.
    pub fn final_state(&self) -> &GameState {
        let last = self.snapshots.len() - 1;
        &self.snapshots[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, Player, RejectKind};

    fn opening() -> MoveHistory {
        vec![
            Move::new(Player::X, 4, 4),
            Move::new(Player::O, 3, 3),
            Move::new(Player::X, 0, 0),
        ]
        .into()
    }

    #[test]
    fn test_state_at_minus_one_is_initial() {
        assert_eq!(state_at(&opening(), -1).unwrap(), initial_state());
    }

    #[test]
    fn test_state_at_bounds() {
        let history = opening();
        assert_eq!(
            state_at(&history, 3),
            Err(ReplayError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(matches!(
            state_at(&history, -2),
            Err(ReplayError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            state_at(&MoveHistory::new(), 0),
            Err(ReplayError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_timeline_matches_state_at() {
        let history = opening();
        let replay = Replay::new(history.clone());
        for index in -1..3 {
            assert_eq!(replay.state(index).unwrap(), &state_at(&history, index).unwrap());
        }
        assert_eq!(replay.last_index(), 2);
        assert!(replay.corruption().is_none());
    }

    #[test]
    fn test_corrupt_history_stops_at_last_valid_index() {
        let history: MoveHistory = vec![
            Move::new(Player::X, 4, 4),
            Move::new(Player::O, 0, 0),
            Move::new(Player::X, 1, 1),
        ]
        .into();

        let err = state_at(&history, 2).unwrap_err();
        assert!(matches!(
            &err,
            ReplayError::CorruptHistory { index: 1, reason } if reason.kind() == RejectKind::WrongSubBoard
        ));
        assert!(!err.is_recoverable());
        assert!(state_at(&history, 0).is_ok());

        let replay = Replay::new(history);
        assert_eq!(replay.last_index(), 0);
        assert_eq!(replay.corruption(), Some(&err));
        assert_eq!(replay.state(1), Err(err));
    }
}
