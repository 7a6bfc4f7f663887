//! Replay cursor state machine.
//!
//! A cursor is a position on a shared [`Replay`] timeline plus playback
//! settings. Every transition takes `&self` and returns a new cursor, so a
//! rejected transition leaves the caller's cursor exactly as it was.
//!
//! ```text
//! Idle --with_auto_play(true)--> Playing      (no-op at the final index)
//! Playing --tick, not at end--> Playing(index + 1)
//! Playing --tick, at end--> Idle
//! Playing --with_auto_play(false)--> Idle
//! ```
//!
//! `step` and `seek` move the index in either phase. Landing on the final
//! index turns auto-play off, the same as a tick would.

use super::{Replay, ReplayError};
use crate::{GameState, Move, MoveHistory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default auto-play interval.
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// Direction of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward the final move (+1).
    Forward,
    /// Toward the empty board (-1).
    Backward,
}

impl Direction {
    fn delta(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Whether the cursor is advancing on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// Waiting for manual navigation.
    Idle,
    /// Advancing one move per interval.
    Playing,
}

/// Position within a replay timeline.
#[derive(Debug, Clone)]
pub struct ReplayCursor {
    replay: Arc<Replay>,
    index: isize,
    auto_play: bool,
    interval_ms: u64,
}

impl ReplayCursor {
    /// Creates an idle cursor on the empty board.
    #[instrument(skip(replay), fields(len = replay.len()))]
    pub fn new(replay: Arc<Replay>) -> Self {
        Self {
            replay,
            index: -1,
            auto_play: false,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }

    /// Builds the timeline for `history` and opens a cursor on it.
    pub fn from_history(history: MoveHistory) -> Self {
        Self::new(Arc::new(Replay::new(history)))
    }

    /// Current index (`-1` is the empty board).
    pub fn index(&self) -> isize {
        self.index
    }

    /// Whether auto-play is on.
    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    /// Auto-play interval in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Current phase.
    pub fn phase(&self) -> PlaybackPhase {
        if self.auto_play {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Idle
        }
    }

    /// The shared timeline.
    pub fn replay(&self) -> &Arc<Replay> {
        &self.replay
    }

    /// The history being replayed.
    pub fn history(&self) -> &MoveHistory {
        self.replay.history()
    }

    /// The highest reachable index.
    pub fn last_index(&self) -> isize {
        self.replay.last_index()
    }

    /// Returns true at the highest reachable index.
    pub fn is_at_end(&self) -> bool {
        self.index >= self.last_index()
    }

    /// The state shown at the current index.
    pub fn state(&self) -> &GameState {
        self.replay
            .state(self.index)
            .unwrap_or_else(|_| self.replay.final_state())
    }

    /// The move that produced the current state, if any.
    pub fn current_move(&self) -> Option<&Move> {
        usize::try_from(self.index)
            .ok()
            .and_then(|index| self.history().get(index))
    }

    /// Moves one step, clamped to `[-1, last_index]`. Never fails.
    #[instrument(skip(self), fields(index = self.index))]
    pub fn step(&self, direction: Direction) -> Self {
        let index = (self.index + direction.delta()).clamp(-1, self.last_index());
        self.at(index)
    }

    /// Jumps directly to `index`.
    ///
    /// Fails with [`ReplayError::IndexOutOfRange`] outside `[-1, len)` and
    /// with [`ReplayError::CorruptHistory`] past the last valid move.
    #[instrument(skip(self), fields(from = self.index))]
    pub fn seek(&self, index: isize) -> Result<Self, ReplayError> {
        self.replay.state(index)?;
        Ok(self.at(index))
    }

    /// Turns auto-play on or off.
    ///
    /// Turning it on at the final index leaves the cursor idle.
    #[instrument(skip(self), fields(index = self.index))]
    pub fn with_auto_play(&self, on: bool) -> Self {
        let mut next = self.clone();
        next.auto_play = on && !self.is_at_end();
        if on && !next.auto_play {
            debug!("Already at the final move; auto-play stays off");
        }
        next
    }

    /// Changes the auto-play interval.
    #[instrument(skip(self))]
    pub fn with_interval_ms(&self, interval_ms: u64) -> Result<Self, ReplayError> {
        if interval_ms == 0 {
            return Err(ReplayError::InvalidInterval(interval_ms));
        }
        let mut next = self.clone();
        next.interval_ms = interval_ms;
        Ok(next)
    }

    /// One auto-play tick.
    ///
    /// Idle cursors are unchanged. A playing cursor advances one move and
    /// turns auto-play off once it reaches the final index.
    #[instrument(skip(self), fields(index = self.index, auto_play = self.auto_play))]
    pub fn tick(&self) -> Self {
        if !self.auto_play {
            return self.clone();
        }

        let index = (self.index + 1).min(self.last_index());
        self.at(index)
    }

    fn at(&self, index: isize) -> Self {
        let mut next = self.clone();
        next.index = index;
        if next.auto_play && next.is_at_end() {
            debug!(index, "Reached final move; auto-play stops");
            next.auto_play = false;
        }
        next
    }
}

impl PartialEq for ReplayCursor {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.replay, &other.replay) || self.replay == other.replay)
            && self.index == other.index
            && self.auto_play == other.auto_play
            && self.interval_ms == other.interval_ms
    }
}

impl Eq for ReplayCursor {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, state_at};

    fn three_moves() -> MoveHistory {
        vec![
            Move::new(Player::X, 4, 4),
            Move::new(Player::O, 3, 3),
            Move::new(Player::X, 0, 0),
        ]
        .into()
    }

    #[test]
    fn test_step_clamps_at_both_ends() {
        let cursor = ReplayCursor::from_history(three_moves());
        assert_eq!(cursor.step(Direction::Backward).index(), -1);

        let end = cursor.seek(2).unwrap();
        assert_eq!(end.step(Direction::Forward).index(), 2);
        assert_eq!(end.step(Direction::Backward).index(), 1);
    }

    #[test]
    fn test_seek_out_of_range_keeps_cursor() {
        let cursor = ReplayCursor::from_history(three_moves());
        assert_eq!(
            cursor.seek(3),
            Err(ReplayError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(cursor.seek(-2).is_err());
        assert_eq!(cursor.index(), -1);
    }

    #[test]
    fn test_state_follows_index() {
        let history = three_moves();
        let cursor = ReplayCursor::from_history(history.clone()).seek(1).unwrap();
        assert_eq!(cursor.state(), &state_at(&history, 1).unwrap());
        assert_eq!(cursor.current_move(), history.get(1));
    }

    #[test]
    fn test_auto_play_runs_to_the_end_and_stops() {
        let mut cursor = ReplayCursor::from_history(three_moves()).with_auto_play(true);
        assert_eq!(cursor.phase(), PlaybackPhase::Playing);

        let mut visited = Vec::new();
        while cursor.auto_play() {
            cursor = cursor.tick();
            visited.push(cursor.index());
        }

        assert_eq!(visited, vec![0, 1, 2]);
        assert_eq!(cursor.index(), 2);
        assert_eq!(cursor.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_auto_play_at_end_is_noop() {
        let cursor = ReplayCursor::from_history(three_moves()).seek(2).unwrap();
        assert_eq!(cursor.with_auto_play(true).phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_manual_navigation_does_not_stop_auto_play() {
        let cursor = ReplayCursor::from_history(three_moves()).with_auto_play(true);
        let cursor = cursor.step(Direction::Forward);
        assert!(cursor.auto_play());
        let cursor = cursor.seek(-1).unwrap();
        assert!(cursor.auto_play());
    }

    #[test]
    fn test_navigating_onto_final_move_stops_auto_play() {
        let playing = ReplayCursor::from_history(three_moves()).with_auto_play(true);

        let sought = playing.seek(2).unwrap();
        assert_eq!(sought.index(), 2);
        assert_eq!(sought.phase(), PlaybackPhase::Idle);

        let stepped = playing.seek(1).unwrap().step(Direction::Forward);
        assert_eq!(stepped.index(), 2);
        assert_eq!(stepped.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_tick_when_idle_is_noop() {
        let cursor = ReplayCursor::from_history(three_moves());
        assert_eq!(cursor.tick(), cursor);
    }

    #[test]
    fn test_interval_must_be_positive() {
        let cursor = ReplayCursor::from_history(three_moves());
        assert_eq!(cursor.with_interval_ms(0), Err(ReplayError::InvalidInterval(0)));
        assert_eq!(cursor.with_interval_ms(250).unwrap().interval_ms(), 250);
    }
}
