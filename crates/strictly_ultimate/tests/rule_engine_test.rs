//! Tests for the ultimate tic-tac-toe rule engine.

use strictly_ultimate::invariants::{InvariantSet, UltimateInvariants};
use strictly_ultimate::rules::{LINES, macro_outcome};
use strictly_ultimate::{
    Coord, Game, GameState, Move, Outcome, Player, Position, RejectKind, RejectReason,
    SubBoardStatus, apply_move, initial_state, legal_moves,
};

fn play_all(moves: &[(Player, usize, usize)]) -> Game {
    let mut game = Game::new();
    for (player, row, col) in moves {
        game.play(Move::new(*player, *row, *col))
            .unwrap_or_else(|e| panic!("{:?} ({}, {}) rejected: {}", player, row, col, e));
    }
    game
}

/// Deterministic pseudo-random playout, picking among legal moves.
fn playout(seed: u64) -> Game {
    let mut game = Game::new();
    let mut rng = seed;
    loop {
        let moves = legal_moves(game.state());
        if moves.is_empty() {
            return game;
        }
        rng = rng
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let coord = moves[((rng >> 33) as usize) % moves.len()];
        let player = game.state().current_player();
        game.play(Move::at(player, coord)).expect("legal move accepted");
    }
}

#[test]
fn test_center_opening_routes_to_center() {
    let state = apply_move(&initial_state(), Move::new(Player::X, 4, 4)).unwrap();
    assert_eq!(state.active_sub_board(), Some(Position::Center));
    assert_eq!(state.current_player(), Player::O);

    let err = apply_move(&state, Move::new(Player::O, 0, 0)).unwrap_err();
    assert_eq!(
        err,
        RejectReason::WrongSubBoard {
            required: Position::Center,
            attempted: Position::TopLeft,
        }
    );
}

#[test]
fn test_won_sub_board_frees_the_next_mover() {
    let game = play_all(&[
        (Player::X, 0, 1),
        (Player::O, 0, 3),
        (Player::X, 0, 2),
        (Player::O, 0, 6),
        (Player::X, 0, 0),
    ]);
    let state = game.state();

    assert_eq!(state.sub_status(Position::TopLeft), SubBoardStatus::WonBy(Player::X));
    // X's last move pointed at the sub-board it just won.
    assert_eq!(state.active_sub_board(), None);
    assert_eq!(state.outcome(), Outcome::InProgress);

    let err = apply_move(state, Move::new(Player::O, 1, 1)).unwrap_err();
    assert_eq!(err, RejectReason::SubBoardClosed(Position::TopLeft));

    // A move aimed at the closed sub-board also leaves the next mover free.
    let next = apply_move(state, Move::new(Player::O, 3, 0)).unwrap();
    assert_eq!(next.active_sub_board(), None);
    // Everything outside the won sub-board that is still empty.
    assert_eq!(legal_moves(&next).len(), 81 - 9 - 3);
}

#[test]
fn test_won_sub_board_status_is_immutable() {
    let game = play_all(&[
        (Player::X, 0, 1),
        (Player::O, 0, 3),
        (Player::X, 0, 2),
        (Player::O, 0, 6),
        (Player::X, 0, 0),
    ]);

    let mut state = game.state().clone();
    for _ in 0..20 {
        if state.outcome().is_terminal() {
            break;
        }
        let coord = legal_moves(&state)[0];
        state = apply_move(&state, Move::at(state.current_player(), coord)).unwrap();
        assert_eq!(state.sub_status(Position::TopLeft), SubBoardStatus::WonBy(Player::X));
    }
}

#[test]
fn test_rejection_order() {
    let state = apply_move(&initial_state(), Move::new(Player::X, 4, 4)).unwrap();

    // Wrong player wins over every later check.
    let err = apply_move(&state, Move::new(Player::X, 99, 99)).unwrap_err();
    assert_eq!(err.kind(), RejectKind::WrongPlayer);

    let err = apply_move(&state, Move::new(Player::O, 9, 0)).unwrap_err();
    assert_eq!(err.kind(), RejectKind::OutOfBounds);

    // Occupied is reported before wrong sub-board would be.
    let err = apply_move(&state, Move::new(Player::O, 4, 4)).unwrap_err();
    assert_eq!(err, RejectReason::CellOccupied(Coord::new(4, 4).unwrap()));
}

#[test]
fn test_finished_game_rejects_everything() {
    let game = playout(7);
    let state = game.state();
    assert!(state.outcome().is_terminal());

    let err = apply_move(state, Move::new(state.current_player(), 0, 0)).unwrap_err();
    assert_eq!(err, RejectReason::GameAlreadyOver);

    // Game over is reported before the wrong player would be.
    let err = apply_move(state, Move::new(state.current_player().opponent(), 0, 0)).unwrap_err();
    assert_eq!(err, RejectReason::GameAlreadyOver);
}

#[test]
fn test_closed_sub_board_reported_before_wrong_sub_board() {
    let game = play_all(&[
        (Player::X, 0, 1),
        (Player::O, 0, 3),
        (Player::X, 0, 2),
        (Player::O, 0, 6),
        (Player::X, 0, 0),
        (Player::O, 4, 4),
    ]);
    let state = game.state();
    assert_eq!(state.active_sub_board(), Some(Position::Center));

    let err = apply_move(state, Move::new(Player::X, 1, 1)).unwrap_err();
    assert_eq!(err, RejectReason::SubBoardClosed(Position::TopLeft));
}

#[test]
fn test_terminal_state_freezes_current_player() {
    let game = playout(11);
    let last = game.history().moves().last().unwrap();
    assert_eq!(game.state().current_player(), last.player);
}

#[test]
fn test_playouts_respect_outcome_rules() {
    let mut wins = 0;
    for seed in 0..50 {
        let game = playout(seed);
        let state: &GameState = game.state();
        assert!(UltimateInvariants::check_all(&game).is_ok(), "seed {}", seed);

        let statuses = state.sub_statuses();
        match state.outcome() {
            Outcome::Won(player) => {
                wins += 1;
                assert!(LINES.iter().any(|line| line
                    .iter()
                    .all(|pos| statuses[pos.to_index()] == SubBoardStatus::WonBy(player))));
            }
            Outcome::Draw => {
                assert!(statuses.iter().all(|s| !s.is_open()));
            }
            Outcome::InProgress => panic!("playout {} stopped early", seed),
        }
        assert_eq!(macro_outcome(statuses), state.outcome());
    }
    assert!(wins > 0);
}

#[test]
fn test_active_sub_board_follows_last_cell() {
    for seed in 0..10 {
        let game = playout(seed);
        let mut state = initial_state();
        for mov in game.history() {
            state = apply_move(&state, *mov).unwrap();
            if state.outcome().is_terminal() {
                continue;
            }
            let target = mov.coord().unwrap().local();
            let expected = state.sub_status(target).is_open().then_some(target);
            assert_eq!(state.active_sub_board(), expected);
        }
    }
}
