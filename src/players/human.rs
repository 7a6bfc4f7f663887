//! Human player that types moves on a line-based input.

use super::Player;
use anyhow::Result;
use strictly_ultimate::{Coord, GameState, Move, apply_move};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::{debug, warn};

/// Human player reading `row col` lines.
///
/// Unparsable or illegal lines are reported on stderr and the player is
/// asked again, so a typo never forfeits.
pub struct HumanPlayer<R = BufReader<Stdin>> {
    name: String,
    input: R,
}

impl HumanPlayer {
    /// Creates a human player reading from stdin.
    pub fn stdin(name: impl Into<String>) -> Self {
        Self::new(name, BufReader::new(tokio::io::stdin()))
    }
}

impl<R> HumanPlayer<R> {
    /// Creates a human player reading from `input`.
    pub fn new(name: impl Into<String>, input: R) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

/// Parses `"row col"` (or `"row,col"`).
fn parse_line(line: &str) -> Option<(usize, usize)> {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some((row, col))
}

#[async_trait::async_trait]
impl<R> Player for HumanPlayer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn choose_move(&mut self, state: &GameState) -> Result<Coord> {
        let mover = state.current_player();
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line).await? == 0 {
                anyhow::bail!("Input closed");
            }

            let Some((row, col)) = parse_line(line.trim()) else {
                debug!(input = line.trim(), "Unparsable move");
                eprintln!("Enter a move as `row col`, both 0-8.");
                continue;
            };

            match apply_move(state, Move::new(mover, row, col)) {
                Ok(_) => {
                    if let Some(coord) = Coord::new(row, col) {
                        return Ok(coord);
                    }
                }
                Err(reason) => {
                    warn!(player = %self.name, row, col, %reason, "Human entered illegal move");
                    eprintln!("{}", reason);
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
