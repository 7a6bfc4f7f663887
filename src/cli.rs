//! Command-line interface for ultimate.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use strictly_ultimate::Player as Mark;
use strictly_ultimate_arena::PlayerKind;

/// Ultimate tic-tac-toe - bot matches, human play and timed replays
#[derive(Parser, Debug)]
#[command(name = "ultimate")]
#[command(about = "Ultimate tic-tac-toe matches and replays", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (optional)
    #[arg(short, long, global = true, default_value = "ultimate.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Side a human plays.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Moves first.
    X,
    /// Moves second.
    O,
}

impl From<Side> for Mark {
    fn from(side: Side) -> Self {
        match side {
            Side::X => Mark::X,
            Side::O => Mark::O,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a bot-vs-bot match
    Match {
        /// Bot playing X (random or tactical)
        #[arg(long)]
        x: Option<PlayerKind>,

        /// Bot playing O (random or tactical)
        #[arg(long)]
        o: Option<PlayerKind>,

        /// Seed for the bots
        #[arg(long)]
        seed: Option<u64>,

        /// Write the JSON move log here
        #[arg(long)]
        log: Option<PathBuf>,

        /// Auto-replay the match once it ends
        #[arg(long)]
        replay: bool,
    },

    /// Auto-play a JSON move log
    Replay {
        /// Move log written by `match --log`
        file: PathBuf,

        /// Delay between moves (clamped to the configured range)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Index to start from (-1 is the empty board)
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        from: isize,
    },

    /// Play against a bot on the terminal
    Play {
        /// Side you play
        #[arg(long = "as", value_enum, default_value = "x")]
        side: Side,

        /// Opponent bot (random or tactical)
        #[arg(long, default_value = "tactical")]
        bot: PlayerKind,
    },
}
