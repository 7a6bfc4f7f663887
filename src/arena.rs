//! Match orchestration between two seats.

use crate::config::DEFAULT_MAX_MOVES;
use crate::players::Player;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use strictly_ultimate::wire::{MatchLog, MoveLogEntry};
use strictly_ultimate::{Game, Move, MoveHistory, Outcome, Player as Mark};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Messages sent from a running match to its observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// Seats are filled and play is about to begin.
    Started {
        /// Name of the X seat.
        x: String,
        /// Name of the O seat.
        o: String,
    },
    /// A seat has been asked for a move.
    TurnStarted {
        /// Side to move.
        mark: Mark,
        /// Seat name.
        name: String,
    },
    /// A move was accepted.
    MovePlayed {
        /// The move.
        mov: Move,
        /// Rendering of the board after the move.
        board: String,
    },
    /// The match is over.
    Finished(MatchResult),
}

/// How a match ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    /// Played to a terminal position.
    Completed(Outcome),
    /// A seat lost by submitting an illegal move or failing to answer.
    Forfeit {
        /// The seat that forfeited.
        loser: Mark,
        /// What went wrong.
        reason: String,
    },
    /// The move limit was reached first.
    Abandoned {
        /// Moves played.
        moves: usize,
    },
}

impl MatchResult {
    /// The winning side, if any.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            MatchResult::Completed(outcome) => outcome.winner(),
            MatchResult::Forfeit { loser, .. } => Some(loser.opponent()),
            MatchResult::Abandoned { .. } => None,
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Completed(outcome) => write!(f, "{}", outcome),
            MatchResult::Forfeit { loser, reason } => {
                write!(f, "Player {} forfeits ({}); Player {} wins", loser, reason, loser.opponent())
            }
            MatchResult::Abandoned { moves } => write!(f, "Abandoned after {} moves", moves),
        }
    }
}

/// Everything kept about a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct MatchRecord {
    /// Accepted moves in order.
    history: MoveHistory,
    /// How it ended.
    result: MatchResult,
    /// When it ended.
    finished_at: DateTime<Utc>,
}

impl MatchRecord {
    /// The move log in the bot-match payload format.
    pub fn to_log(&self) -> MatchLog {
        MatchLog {
            move_history: self.history.iter().map(MoveLogEntry::from).collect(),
            winner: match &self.result {
                MatchResult::Completed(outcome) => strictly_ultimate::wire::outcome_code(*outcome),
                other => other.winner().map(Mark::code),
            },
        }
    }
}

/// Runs one game between two seats.
pub struct Match {
    game: Game,
    player_x: Box<dyn Player>,
    player_o: Box<dyn Player>,
    event_tx: Option<mpsc::UnboundedSender<MatchEvent>>,
    max_moves: usize,
}

impl Match {
    /// Creates a match with X moving first.
    pub fn new(player_x: Box<dyn Player>, player_o: Box<dyn Player>) -> Self {
        Self {
            game: Game::new(),
            player_x,
            player_o,
            event_tx: None,
            max_moves: DEFAULT_MAX_MOVES,
        }
    }

    /// Sends progress to `event_tx`.
    pub fn with_events(mut self, event_tx: mpsc::UnboundedSender<MatchEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Abandons the match after `max_moves` moves.
    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    /// Runs the game loop to completion.
    #[instrument(skip(self), fields(x = %self.player_x.name(), o = %self.player_o.name()))]
    pub async fn run(mut self) -> MatchRecord {
        info!("Starting match");
        self.emit(MatchEvent::Started {
            x: self.player_x.name().to_string(),
            o: self.player_o.name().to_string(),
        });

        let result = loop {
            let state = self.game.state().clone();
            if state.outcome().is_terminal() {
                break MatchResult::Completed(state.outcome());
            }
            if self.game.history().len() >= self.max_moves {
                warn!(moves = self.max_moves, "Move limit reached");
                break MatchResult::Abandoned {
                    moves: self.game.history().len(),
                };
            }

            let mark = state.current_player();
            let name = match mark {
                Mark::X => self.player_x.name(),
                Mark::O => self.player_o.name(),
            }
            .to_string();
            self.emit(MatchEvent::TurnStarted {
                mark,
                name: name.clone(),
            });

            debug!(player = %name, "Waiting for move");
            let seat = match mark {
                Mark::X => &mut self.player_x,
                Mark::O => &mut self.player_o,
            };
            let coord = match seat.choose_move(&state).await {
                Ok(coord) => coord,
                Err(e) => {
                    warn!(player = %name, error = %e, "Seat failed to move");
                    break MatchResult::Forfeit {
                        loser: mark,
                        reason: e.to_string(),
                    };
                }
            };

            let mov = Move::at(mark, coord);
            match self.game.play(mov) {
                Ok(next) => {
                    let board = next.display();
                    self.emit(MatchEvent::MovePlayed { mov, board });
                }
                Err(reason) => {
                    warn!(player = %name, %mov, %reason, "Illegal move forfeits");
                    break MatchResult::Forfeit {
                        loser: mark,
                        reason: reason.to_string(),
                    };
                }
            }
        };

        info!(%result, moves = self.game.history().len(), "Match over");
        self.emit(MatchEvent::Finished(result.clone()));

        MatchRecord::new(self.game.history().clone(), result, Utc::now())
    }

    fn emit(&self, event: MatchEvent) {
        if let Some(tx) = &self.event_tx
            && tx.send(event).is_err()
        {
            debug!("Match observer has gone away");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forfeit_names_the_other_side() {
        let result = MatchResult::Forfeit {
            loser: Mark::O,
            reason: "crashed".to_string(),
        };
        assert_eq!(result.winner(), Some(Mark::X));
        assert_eq!(result.to_string(), "Player O forfeits (crashed); Player X wins");
    }

    #[test]
    fn test_draw_has_no_winner() {
        assert_eq!(MatchResult::Completed(Outcome::Draw).winner(), None);
        assert_eq!(MatchResult::Abandoned { moves: 81 }.winner(), None);
    }
}
