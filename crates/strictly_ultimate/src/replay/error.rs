//! Replay error types.

use crate::action::RejectReason;

/// Error raised while deriving or navigating a replay.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ReplayError {
    /// The requested index is outside `[-1, len)`.
    ///
    /// Recoverable: the caller keeps its cursor and may retry.
    #[display("Replay index {} is outside [-1, {})", index, len)]
    IndexOutOfRange {
        /// Requested index.
        index: isize,
        /// History length.
        len: usize,
    },

    /// A logged move was rejected when the history was folded.
    ///
    /// The log should only ever hold accepted moves, so this points at the
    /// producer or the transport. Replay stops before the bad move.
    #[display("Move {} of the history was rejected: {}", index, reason)]
    CorruptHistory {
        /// Index of the first rejected move.
        index: usize,
        /// Why it was rejected.
        reason: RejectReason,
    },

    /// Auto-play intervals must be positive.
    #[display("Auto-play interval must be positive, got {} ms", _0)]
    InvalidInterval(u64),
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::CorruptHistory { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl ReplayError {
    /// Returns true for failures the caller can simply surface and ignore.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ReplayError::CorruptHistory { .. })
    }
}
