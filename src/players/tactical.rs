//! Bot that wins or blocks sub-boards when it sees the chance.

use super::{Player, RandomPlayer};
use anyhow::Result;
use strictly_ultimate::rules::line_winner;
use strictly_ultimate::{Cell, Coord, GameState, Player as Mark, legal_moves};
use tracing::{debug, instrument};

/// Takes a sub-board win if one is available, otherwise blocks the
/// opponent's, otherwise plays randomly.
#[derive(Debug)]
pub struct TacticalPlayer {
    fallback: RandomPlayer,
}

impl TacticalPlayer {
    /// Creates a tactical bot; `seed` drives its random fallback.
    #[instrument(skip(name))]
    pub fn new(name: impl Into<String>, seed: Option<u64>) -> Self {
        Self {
            fallback: RandomPlayer::new(name, seed),
        }
    }
}

/// Whether `mark` at `coord` would complete a line in its sub-board.
fn completes_line(state: &GameState, coord: Coord, mark: Mark) -> bool {
    let mut cells = state.board().sub_board(coord.sub_board());
    cells[coord.local().to_index()] = Cell::Occupied(mark);
    line_winner(&cells) == Some(mark)
}

#[async_trait::async_trait]
impl Player for TacticalPlayer {
    async fn choose_move(&mut self, state: &GameState) -> Result<Coord> {
        let me = state.current_player();
        let moves = legal_moves(state);

        if let Some(coord) = moves.iter().copied().find(|c| completes_line(state, *c, me)) {
            debug!(bot = %self.name(), %coord, "Taking sub-board");
            return Ok(coord);
        }

        let them = me.opponent();
        if let Some(coord) = moves.iter().copied().find(|c| completes_line(state, *c, them)) {
            debug!(bot = %self.name(), %coord, "Blocking sub-board");
            return Ok(coord);
        }

        self.fallback.choose_move(state).await
    }

    fn name(&self) -> &str {
        self.fallback.name()
    }
}
