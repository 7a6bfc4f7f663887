//! Player trait and implementations.

mod human;
mod random;
mod tactical;

pub use human::HumanPlayer;
pub use random::RandomPlayer;
pub use tactical::TacticalPlayer;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use strictly_ultimate::{Coord, GameState};

/// Trait for players that can make moves.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Picks the next cell for the side to move in `state`.
    ///
    /// Returning an illegal cell forfeits the match.
    async fn choose_move(&mut self, state: &GameState) -> Result<Coord>;

    /// Returns the player's display name.
    fn name(&self) -> &str;
}

/// The kinds of seat a match can be configured with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Uniformly random legal moves.
    Random,
    /// Wins or blocks sub-boards when it can.
    Tactical,
    /// Moves typed on stdin.
    Human,
}

impl PlayerKind {
    /// Returns true for computer-controlled seats.
    pub fn is_bot(self) -> bool {
        !matches!(self, PlayerKind::Human)
    }

    /// Builds a seat of this kind.
    ///
    /// Human seats read from the process's stdin.
    pub fn build(self, name: impl Into<String>, seed: Option<u64>) -> Box<dyn Player> {
        match self {
            PlayerKind::Random => Box::new(RandomPlayer::new(name, seed)),
            PlayerKind::Tactical => Box::new(TacticalPlayer::new(name, seed)),
            PlayerKind::Human => Box::new(HumanPlayer::stdin(name)),
        }
    }
}
