//! Arena configuration loaded from TOML.

use crate::players::PlayerKind;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_ultimate::DEFAULT_INTERVAL_MS;
use tracing::{debug, info, instrument};

/// Fastest auto-play speed offered by default.
pub const MIN_INTERVAL_MS: u64 = 100;

/// Slowest auto-play speed offered by default.
pub const MAX_INTERVAL_MS: u64 = 2000;

/// A full game never takes more than 81 moves.
pub const DEFAULT_MAX_MOVES: usize = 81;

/// Replay speed settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Delay between auto-play ticks.
    interval_ms: u64,
    /// Lower bound for requested intervals.
    min_interval_ms: u64,
    /// Upper bound for requested intervals.
    max_interval_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            min_interval_ms: MIN_INTERVAL_MS,
            max_interval_ms: MAX_INTERVAL_MS,
        }
    }
}

impl ReplayConfig {
    /// Clamps a requested interval into the configured range.
    pub fn clamp_interval(&self, requested: u64) -> u64 {
        let clamped = requested
            .max(self.min_interval_ms)
            .min(self.max_interval_ms);
        if clamped != requested {
            debug!(requested, clamped, "Auto-play interval clamped");
        }
        clamped
    }

    /// The configured interval, clamped.
    pub fn interval(&self) -> u64 {
        self.clamp_interval(self.interval_ms)
    }

    /// Returns a copy with a different default interval.
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    #[track_caller]
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_interval_ms == 0 {
            return Err(ConfigError::new(
                "replay.min_interval_ms must be positive".to_string(),
            ));
        }
        if self.min_interval_ms > self.max_interval_ms {
            return Err(ConfigError::new(format!(
                "replay.min_interval_ms ({}) exceeds replay.max_interval_ms ({})",
                self.min_interval_ms, self.max_interval_ms
            )));
        }
        Ok(())
    }
}

/// Match settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Who plays X.
    player_x: PlayerKind,
    /// Who plays O.
    player_o: PlayerKind,
    /// Seed for the bots; random when absent.
    seed: Option<u64>,
    /// Moves after which a match is abandoned.
    max_moves: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player_x: PlayerKind::Tactical,
            player_o: PlayerKind::Random,
            seed: None,
            max_moves: DEFAULT_MAX_MOVES,
        }
    }
}

impl MatchConfig {
    /// Replaces the seats that were given.
    pub fn with_players(mut self, x: Option<PlayerKind>, o: Option<PlayerKind>) -> Self {
        if let Some(x) = x {
            self.player_x = x;
        }
        if let Some(o) = o {
            self.player_o = o;
        }
        self
    }

    /// Replaces the seed when one is given.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }
}

/// Top-level configuration (`ultimate.toml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// `[replay]` section.
    replay: ReplayConfig,
    /// `[match]` section.
    #[serde(rename = "match")]
    matchup: MatchConfig,
}

impl ArenaConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            interval_ms = config.replay.interval(),
            player_x = %config.matchup.player_x,
            player_o = %config.matchup.player_o,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.replay.validate()?;
        if config.matchup.max_moves == 0 {
            return Err(ConfigError::new(
                "match.max_moves must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Returns a copy with a different `[replay]` section.
    pub fn with_replay(mut self, replay: ReplayConfig) -> Self {
        self.replay = replay;
        self
    }

    /// Returns a copy with a different `[match]` section.
    pub fn with_matchup(mut self, matchup: MatchConfig) -> Self {
        self.matchup = matchup;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ArenaConfig::default();
        assert_eq!(config.replay().interval(), DEFAULT_INTERVAL_MS);
        assert_eq!(*config.matchup().max_moves(), DEFAULT_MAX_MOVES);
        assert_eq!(*config.matchup().seed(), None);
    }

    #[test]
    fn test_clamp_interval() {
        let replay = ReplayConfig::default();
        assert_eq!(replay.clamp_interval(5), MIN_INTERVAL_MS);
        assert_eq!(replay.clamp_interval(750), 750);
        assert_eq!(replay.clamp_interval(60_000), MAX_INTERVAL_MS);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ArenaConfig::from_toml("[replay]\ninterval_ms = 250\n").unwrap();
        assert_eq!(config.replay().interval(), 250);
        assert_eq!(*config.replay().max_interval_ms(), MAX_INTERVAL_MS);
        assert_eq!(config.matchup(), &MatchConfig::default());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = ArenaConfig::from_toml(
            "[replay]\nmin_interval_ms = 900\nmax_interval_ms = 300\n",
        )
        .unwrap_err();
        assert!(err.message.contains("exceeds"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_overrides_only_replace_given_values() {
        let matchup = MatchConfig::default()
            .with_players(None, Some(PlayerKind::Tactical))
            .with_seed(Some(9));
        assert_eq!(*matchup.player_x(), PlayerKind::Tactical);
        assert_eq!(*matchup.player_o(), PlayerKind::Tactical);
        assert_eq!(*matchup.seed(), Some(9));
        assert_eq!(matchup.with_seed(None).seed(), &Some(9));
    }
}
