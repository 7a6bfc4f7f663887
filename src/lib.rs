//! Ultimate tic-tac-toe arena - sessions, matches and timed replay
//!
//! Host-side collaborators around the pure rules in `strictly_ultimate`.
//!
//! # Architecture
//!
//! - **Players**: async seats (random bot, tactical bot, human on stdin)
//! - **Arena**: runs a match between two seats and records it
//! - **Session**: one game per session, plus an optional replay
//! - **Playback**: a cancellable task that auto-plays a replay cursor
//! - **Config**: `ultimate.toml` with replay speed and match settings
//!
//! # Example
//!
//! ```no_run
//! use strictly_ultimate_arena::{Match, PlayerKind};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let x = PlayerKind::Tactical.build("X", Some(1));
//! let o = PlayerKind::Random.build("O", Some(2));
//! let record = Match::new(x, o).run().await;
//! println!("{}", record.result());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod arena;
mod config;
mod playback;
mod players;
mod session;

// Crate-level exports - Configuration
pub use config::{
    ArenaConfig, ConfigError, DEFAULT_MAX_MOVES, MAX_INTERVAL_MS, MIN_INTERVAL_MS, MatchConfig,
    ReplayConfig,
};

// Crate-level exports - Players
pub use players::{HumanPlayer, Player, PlayerKind, RandomPlayer, TacticalPlayer};

// Crate-level exports - Matches
pub use arena::{Match, MatchEvent, MatchRecord, MatchResult};

// Crate-level exports - Playback
pub use playback::{PlaybackCommand, PlaybackControl, PlaybackError, PlaybackHandle};

// Crate-level exports - Session management
pub use session::{GameMode, Seat, Session, SessionError, SessionId, SessionManager};
