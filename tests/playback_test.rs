//! Tests for the timed auto-play driver.

use std::time::Duration;
use strictly_ultimate::{Direction, Move, MoveHistory, Player, ReplayCursor, ReplayError};
use strictly_ultimate_arena::{MIN_INTERVAL_MS, PlaybackError, PlaybackHandle, ReplayConfig};
use tokio::time::Instant;

fn three_moves() -> MoveHistory {
    vec![
        Move::new(Player::X, 4, 4),
        Move::new(Player::O, 3, 3),
        Move::new(Player::X, 0, 0),
    ]
    .into()
}

fn spawn() -> PlaybackHandle {
    PlaybackHandle::spawn(
        ReplayCursor::from_history(three_moves()),
        &ReplayConfig::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_auto_play_ticks_once_per_interval_then_stops() {
    let handle = spawn();
    let control = handle.control();
    let mut frames = control.subscribe();
    let start = Instant::now();

    let cursor = control.set_auto_play(true).await.unwrap();
    assert!(cursor.auto_play());
    frames.mark_unchanged();

    let mut seen = Vec::new();
    while frames.changed().await.is_ok() {
        let cursor = frames.borrow_and_update().clone();
        seen.push((cursor.index(), start.elapsed()));
        if !cursor.auto_play() {
            break;
        }
    }

    let indices: Vec<_> = seen.iter().map(|(index, _)| *index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    for (tick, (_, elapsed)) in seen.iter().enumerate() {
        let due = Duration::from_millis(500 * (tick as u64 + 1));
        assert!(*elapsed >= due, "tick {} at {:?}", tick, elapsed);
        assert!(*elapsed < due + Duration::from_millis(50));
    }
    assert!(control.cursor().is_at_end());
}

#[tokio::test(start_paused = true)]
async fn test_manual_seek_supersedes_scheduled_tick() {
    let handle = spawn();
    let control = handle.control();
    let mut frames = control.subscribe();
    let start = Instant::now();

    control.set_auto_play(true).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    let cursor = control.seek(0).await.unwrap();
    assert_eq!(cursor.index(), 0);
    assert!(cursor.auto_play());

    frames.mark_unchanged();
    frames.changed().await.unwrap();
    let cursor = frames.borrow_and_update().clone();

    // The tick due at 500ms was replaced by one 500ms after the seek.
    assert_eq!(cursor.index(), 1);
    assert!(start.elapsed() >= Duration::from_millis(800));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_seek_keeps_scheduled_tick() {
    let handle = spawn();
    let control = handle.control();
    let mut frames = control.subscribe();
    let start = Instant::now();

    control.set_auto_play(true).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(control.seek(99).await.is_err());

    frames.mark_unchanged();
    frames.changed().await.unwrap();
    let cursor = frames.borrow_and_update().clone();

    assert_eq!(cursor.index(), 0);
    assert!(start.elapsed() >= Duration::from_millis(500));
    assert!(start.elapsed() < Duration::from_millis(800));
}

#[tokio::test(start_paused = true)]
async fn test_seeking_to_final_move_goes_idle_at_once() {
    let handle = spawn();
    let control = handle.control();
    let start = Instant::now();

    control.set_auto_play(true).await.unwrap();
    let cursor = control.seek(2).await.unwrap();
    assert!(!cursor.auto_play());

    let end = control.wait_until_idle().await.unwrap();
    assert_eq!(end.index(), 2);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_stepping_onto_final_move_goes_idle_at_once() {
    let handle = spawn();
    let control = handle.control();

    control.seek(1).await.unwrap();
    control.set_auto_play(true).await.unwrap();
    let cursor = control.step(Direction::Forward).await.unwrap();

    assert_eq!(cursor.index(), 2);
    assert!(!cursor.auto_play());
    assert!(!control.cursor().auto_play());
}

#[tokio::test(start_paused = true)]
async fn test_disabling_auto_play_cancels_pending_tick() {
    let handle = spawn();
    let control = handle.control();

    control.set_auto_play(true).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    control.set_auto_play(false).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let cursor = control.cursor();
    assert_eq!(cursor.index(), -1);
    assert!(!cursor.auto_play());
}

#[tokio::test(start_paused = true)]
async fn test_rejected_seek_keeps_cursor() {
    let handle = spawn();
    let control = handle.control();
    control.step(Direction::Forward).await.unwrap();

    let err = control.seek(3).await.unwrap_err();
    assert_eq!(
        err,
        PlaybackError::Replay(ReplayError::IndexOutOfRange { index: 3, len: 3 })
    );
    assert_eq!(control.cursor().index(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_interval_is_clamped() {
    let handle = spawn();
    let cursor = handle.control().set_interval_ms(1).await.unwrap();
    assert_eq!(cursor.interval_ms(), MIN_INTERVAL_MS);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_ticks_and_commands() {
    let handle = spawn();
    let control = handle.control();
    let mut frames = control.subscribe();
    control.set_auto_play(true).await.unwrap();
    frames.mark_unchanged();

    handle.shutdown().await;

    assert!(frames.changed().await.is_err());
    assert_eq!(frames.borrow().index(), -1);
    assert_eq!(
        control.step(Direction::Forward).await.unwrap_err(),
        PlaybackError::Stopped
    );
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_cancels_playback() {
    let handle = spawn();
    let control = handle.control();
    control.set_auto_play(true).await.unwrap();

    drop(handle);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(control.cursor().index(), -1);
    assert_eq!(
        control.wait_until_idle().await.unwrap_err(),
        PlaybackError::Stopped
    );
}
