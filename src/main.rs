//! Ultimate tic-tac-toe - unified CLI
//!
//! Bot matches, human-vs-bot play on the terminal and timed replays of
//! saved move logs.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::{Path, PathBuf};
use strictly_ultimate::wire::MatchLog;
use strictly_ultimate::{MoveHistory, Player as Mark, ReplayCursor, initial_state};
use strictly_ultimate_arena::{
    ArenaConfig, Match, MatchConfig, MatchEvent, MatchRecord, PlaybackHandle, PlayerKind,
    ReplayConfig,
};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let config = ArenaConfig::load(&cli.config)?;

    match cli.command {
        Command::Match {
            x,
            o,
            seed,
            log,
            replay,
        } => run_match(config, x, o, seed, log, replay).await,
        Command::Replay {
            file,
            interval_ms,
            from,
        } => run_replay(config, file, interval_ms, from).await,
        Command::Play { side, bot } => run_play(config, side.into(), bot).await,
    }
}

fn initialize_tracing() {
    // Boards go to stdout, diagnostics to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run a bot-vs-bot match
#[instrument(skip(config, log))]
async fn run_match(
    config: ArenaConfig,
    x: Option<PlayerKind>,
    o: Option<PlayerKind>,
    seed: Option<u64>,
    log: Option<PathBuf>,
    replay: bool,
) -> Result<()> {
    let matchup = config.matchup().clone().with_players(x, o).with_seed(seed);
    if !matchup.player_x().is_bot() || !matchup.player_o().is_bot() {
        anyhow::bail!("`match` seats two bots; use `play` to take a seat yourself");
    }

    let record = play_match(&matchup, None).await?;

    if let Some(path) = log {
        write_log(&record, &path)?;
    }
    if replay {
        replay_history(record.history().clone(), config.replay(), -1).await?;
    }
    Ok(())
}

/// Play against a bot
#[instrument(skip(config))]
async fn run_play(config: ArenaConfig, side: Mark, bot: PlayerKind) -> Result<()> {
    if !bot.is_bot() {
        anyhow::bail!("The opponent must be a bot");
    }
    let (x, o) = match side {
        Mark::X => (PlayerKind::Human, bot),
        Mark::O => (bot, PlayerKind::Human),
    };
    let matchup = config.matchup().clone().with_players(Some(x), Some(o));
    play_match(&matchup, Some(side)).await?;
    Ok(())
}

/// Replay a saved move log
#[instrument(skip(config))]
async fn run_replay(
    config: ArenaConfig,
    file: PathBuf,
    interval_ms: Option<u64>,
    from: isize,
) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read move log {}", file.display()))?;
    let log: MatchLog = serde_json::from_str(&content).context("Failed to parse move log")?;
    let history = log.to_history()?;
    info!(moves = history.len(), "Move log loaded");

    let replay = match interval_ms {
        Some(interval_ms) => config.replay().clone().with_interval_ms(interval_ms),
        None => config.replay().clone(),
    };
    replay_history(history, &replay, from).await
}

async fn play_match(matchup: &MatchConfig, human: Option<Mark>) -> Result<MatchRecord> {
    let seed = *matchup.seed();
    let x_kind = *matchup.player_x();
    let o_kind = *matchup.player_o();
    let player_x = x_kind.build(format!("X ({})", x_kind), seed);
    let player_o = o_kind.build(format!("O ({})", o_kind), seed.map(|s| s.wrapping_add(1)));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let runner = tokio::spawn(
        Match::new(player_x, player_o)
            .with_events(event_tx)
            .with_max_moves(*matchup.max_moves())
            .run(),
    );

    while let Some(event) = event_rx.recv().await {
        print_event(&event, human);
    }

    runner.await.context("Match task failed")
}

fn print_event(event: &MatchEvent, human: Option<Mark>) {
    match event {
        MatchEvent::Started { x, o } => {
            println!("{} vs {}", x, o);
            if human.is_some() {
                println!("{}", initial_state().display());
            }
        }
        MatchEvent::TurnStarted { mark, .. } => {
            if human == Some(*mark) {
                println!("Your move as {} (row col):", mark);
            }
        }
        MatchEvent::MovePlayed { mov, board } => {
            println!("{}", mov);
            println!("{}", board);
        }
        MatchEvent::Finished(result) => println!("{}", result),
    }
}

#[instrument(skip(record))]
fn write_log(record: &MatchRecord, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&record.to_log())?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write move log {}", path.display()))?;
    info!(path = %path.display(), "Move log written");
    Ok(())
}

async fn replay_history(history: MoveHistory, replay: &ReplayConfig, from: isize) -> Result<()> {
    let cursor = ReplayCursor::from_history(history);
    if let Some(corruption) = cursor.replay().corruption() {
        warn!(%corruption, "Replay ends early");
        eprintln!("Warning: {}", corruption);
    }
    let cursor = cursor.seek(from)?;

    let handle = PlaybackHandle::spawn(cursor, replay);
    let control = handle.control();
    let mut frames = control.subscribe();
    let mut shown = {
        let cursor = frames.borrow_and_update();
        print_frame(&cursor);
        cursor.index()
    };
    control.set_auto_play(true).await?;

    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let cursor = frames.borrow_and_update().clone();
                if cursor.index() != shown {
                    print_frame(&cursor);
                    shown = cursor.index();
                }
                if !cursor.auto_play() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted; stopping replay");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn print_frame(cursor: &ReplayCursor) {
    match cursor.current_move() {
        Some(mov) => println!(
            "Move {}/{}: {}",
            cursor.index() + 1,
            cursor.history().len(),
            mov
        ),
        None => println!("Start"),
    }
    println!("{}", cursor.state().display());
}
