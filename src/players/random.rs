//! Bot that plays a uniformly random legal move.

use super::Player;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strictly_ultimate::{Coord, GameState, legal_moves};
use tracing::{debug, instrument};

/// Picks any legal cell with equal probability.
#[derive(Debug)]
pub struct RandomPlayer {
    name: String,
    rng: StdRng,
}

impl RandomPlayer {
    /// Creates a random bot. The same seed replays the same choices.
    #[instrument(skip(name))]
    pub fn new(name: impl Into<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            name: name.into(),
            rng,
        }
    }

    /// Picks uniformly from `moves`.
    pub(crate) fn pick(&mut self, moves: &[Coord]) -> Option<Coord> {
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.random_range(0..moves.len())])
    }
}

#[async_trait::async_trait]
impl Player for RandomPlayer {
    async fn choose_move(&mut self, state: &GameState) -> Result<Coord> {
        let moves = legal_moves(state);
        let coord = self
            .pick(&moves)
            .ok_or_else(|| anyhow::anyhow!("No legal moves available"))?;
        debug!(bot = %self.name, %coord, options = moves.len(), "Random bot chose");
        Ok(coord)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_ultimate::{Move, Player as Mark, apply_move, initial_state};

    #[tokio::test]
    async fn test_random_moves_are_legal() {
        let mut bot = RandomPlayer::new("rand", Some(3));
        let state = apply_move(&initial_state(), Move::new(Mark::X, 4, 4)).unwrap();
        for _ in 0..20 {
            let coord = bot.choose_move(&state).await.unwrap();
            assert!(legal_moves(&state).contains(&coord));
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_choices() {
        let state = initial_state();
        let mut a = RandomPlayer::new("a", Some(42));
        let mut b = RandomPlayer::new("b", Some(42));
        for _ in 0..10 {
            assert_eq!(
                a.choose_move(&state).await.unwrap(),
                b.choose_move(&state).await.unwrap()
            );
        }
    }
}
