//! Tests for the match runner.

use std::collections::VecDeque;
use strictly_ultimate::{
    Coord, GameState, Outcome, Player as Mark, Replay, apply_move, initial_state,
};
use strictly_ultimate_arena::{Match, MatchEvent, MatchResult, Player, PlayerKind};
use tokio::sync::mpsc;

/// Plays a fixed list of cells, then fails.
struct Scripted {
    name: String,
    moves: VecDeque<(usize, usize)>,
}

impl Scripted {
    fn boxed(name: &str, moves: &[(usize, usize)]) -> Box<dyn Player> {
        Box::new(Self {
            name: name.to_string(),
            moves: moves.iter().copied().collect(),
        })
    }
}

#[async_trait::async_trait]
impl Player for Scripted {
    async fn choose_move(&mut self, _state: &GameState) -> anyhow::Result<Coord> {
        let (row, col) = self
            .moves
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted"))?;
        Coord::new(row, col).ok_or_else(|| anyhow::anyhow!("off the board"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn bots(seed: u64) -> Match {
    Match::new(
        PlayerKind::Tactical.build("tactical", Some(seed)),
        PlayerKind::Random.build("random", Some(seed + 1)),
    )
}

#[tokio::test]
async fn test_bot_match_plays_to_a_terminal_position() {
    let record = bots(5).run().await;

    let MatchResult::Completed(outcome) = record.result() else {
        panic!("unexpected result {:?}", record.result());
    };
    assert!(outcome.is_terminal());

    let replay = Replay::new(record.history().clone());
    assert!(replay.corruption().is_none());
    assert_eq!(replay.final_state().outcome(), *outcome);
}

#[tokio::test]
async fn test_seeded_matches_are_reproducible() {
    let a = bots(21).run().await;
    let b = bots(21).run().await;
    assert_eq!(a.history(), b.history());
    assert_eq!(a.result(), b.result());
}

#[tokio::test]
async fn test_events_bracket_every_move() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let record = bots(8).with_events(tx).run().await;

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert!(matches!(events.first(), Some(MatchEvent::Started { .. })));
    assert_eq!(
        events.last(),
        Some(&MatchEvent::Finished(record.result().clone()))
    );
    let played = events
        .iter()
        .filter(|e| matches!(e, MatchEvent::MovePlayed { .. }))
        .count();
    assert_eq!(played, record.history().len());
}

#[tokio::test]
async fn test_illegal_choice_forfeits() {
    let x = Scripted::boxed("x", &[(4, 4)]);
    let o = Scripted::boxed("o", &[(0, 0)]);
    let record = Match::new(x, o).run().await;

    match record.result() {
        MatchResult::Forfeit { loser, reason } => {
            assert_eq!(*loser, Mark::O);
            assert!(reason.contains("sub-board"), "reason: {}", reason);
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(record.result().winner(), Some(Mark::X));
    assert_eq!(record.history().len(), 1);
    assert_eq!(record.to_log().winner, Some(1));
}

#[tokio::test]
async fn test_failing_seat_forfeits() {
    let x = Scripted::boxed("x", &[]);
    let o = Scripted::boxed("o", &[]);
    let record = Match::new(x, o).run().await;

    assert_eq!(
        record.result(),
        &MatchResult::Forfeit {
            loser: Mark::X,
            reason: "script exhausted".to_string(),
        }
    );
    assert!(record.history().is_empty());
}

#[tokio::test]
async fn test_move_limit_abandons_match() {
    let record = bots(3).with_max_moves(4).run().await;
    assert_eq!(record.result(), &MatchResult::Abandoned { moves: 4 });
    assert_eq!(record.result().winner(), None);
}

#[tokio::test]
async fn test_log_round_trips_through_json() {
    let record = bots(13).run().await;
    let json = serde_json::to_string(&record.to_log()).unwrap();
    let log: strictly_ultimate::wire::MatchLog = serde_json::from_str(&json).unwrap();

    let history = log.to_history().unwrap();
    assert_eq!(&history, record.history());

    let mut state = initial_state();
    for mov in &history {
        state = apply_move(&state, *mov).unwrap();
    }
    if let MatchResult::Completed(Outcome::Won(winner)) = record.result() {
        assert_eq!(log.winner, Some(winner.code()));
        assert_eq!(state.outcome(), Outcome::Won(*winner));
    }
}
