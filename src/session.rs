//! Game session management.

use crate::config::ReplayConfig;
use crate::playback::{PlaybackControl, PlaybackError, PlaybackHandle};
use crate::players::PlayerKind;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strictly_ultimate::{
    Game, GameState, Move, MoveHistory, RejectReason, ReplayCursor, ReplayError,
};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Who sits at the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum GameMode {
    /// Two humans.
    PlayerVsPlayer,
    /// A human against a bot.
    PlayerVsBot,
    /// Two bots.
    BotVsBot,
}

impl GameMode {
    /// The mode implied by two seats.
    pub fn for_seats(x: PlayerKind, o: PlayerKind) -> Self {
        match (x.is_bot(), o.is_bot()) {
            (false, false) => GameMode::PlayerVsPlayer,
            (true, true) => GameMode::BotVsBot,
            _ => GameMode::PlayerVsBot,
        }
    }
}

/// Description of one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Display name.
    pub name: String,
    /// What kind of player fills it.
    pub kind: PlayerKind,
}

impl Seat {
    /// Creates a seat description.
    pub fn new(name: impl Into<String>, kind: PlayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Session failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum SessionError {
    /// The move was rejected; the game is unchanged.
    #[display("Illegal move: {}", _0)]
    IllegalMove(RejectReason),
    /// A replay index or history problem.
    #[display("{}", _0)]
    Replay(ReplayError),
    /// The replay driver has stopped.
    #[from(ignore)]
    #[display("Replay driver stopped")]
    PlaybackStopped,
    /// No session with this id.
    #[from(ignore)]
    #[display("Session not found: {}", _0)]
    NotFound(SessionId),
    /// A session with this id already exists.
    #[from(ignore)]
    #[display("Session already exists: {}", _0)]
    AlreadyExists(SessionId),
    /// Replays are only offered for finished games.
    #[from(ignore)]
    #[display("Game is still in progress")]
    GameInProgress,
    /// No replay is open.
    #[from(ignore)]
    #[display("No replay is open")]
    NoReplay,
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::IllegalMove(e) => Some(e),
            SessionError::Replay(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PlaybackError> for SessionError {
    fn from(error: PlaybackError) -> Self {
        match error {
            PlaybackError::Replay(e) => SessionError::Replay(e),
            PlaybackError::Stopped => SessionError::PlaybackStopped,
        }
    }
}

/// One game and, once it is over, at most one replay of it.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    mode: GameMode,
    seat_x: Seat,
    seat_o: Seat,
    game: Game,
    playback: Option<PlaybackHandle>,
    replay_config: ReplayConfig,
}

impl Session {
    /// Creates a session with a fresh game.
    #[instrument(skip(seat_x, seat_o, replay_config), fields(x = %seat_x.name, o = %seat_o.name))]
    pub fn new(id: SessionId, seat_x: Seat, seat_o: Seat, replay_config: ReplayConfig) -> Self {
        let mode = GameMode::for_seats(seat_x.kind, seat_o.kind);
        info!(session_id = %id, %mode, "Creating new game session");
        Self {
            id,
            mode,
            seat_x,
            seat_o,
            game: Game::new(),
            playback: None,
            replay_config,
        }
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Who is playing.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// The X seat.
    pub fn seat_x(&self) -> &Seat {
        &self.seat_x
    }

    /// The O seat.
    pub fn seat_o(&self) -> &Seat {
        &self.seat_o
    }

    /// The live game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The open replay, if any.
    pub fn playback(&self) -> Option<&PlaybackHandle> {
        self.playback.as_ref()
    }

    /// Plays a move in the live game.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn play(&mut self, mov: Move) -> Result<&GameState, SessionError> {
        let state = self.game.play(mov)?;
        debug!(outcome = %state.outcome(), "Move completed successfully");
        Ok(state)
    }

    /// Starts a new game, cancelling any replay of the old one first.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn restart(&mut self) {
        self.close_replay();
        self.game = std::mem::take(&mut self.game).restart();
        info!("Session restarted");
    }

    /// Opens a replay of the finished game, replacing any open one.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn open_replay(&mut self) -> Result<PlaybackControl, SessionError> {
        if !self.game.state().outcome().is_terminal() {
            warn!("Replay requested before the game ended");
            return Err(SessionError::GameInProgress);
        }
        self.close_replay();

        let cursor = ReplayCursor::from_history(self.game.history().clone());
        let handle = PlaybackHandle::spawn(cursor, &self.replay_config);
        let control = handle.control();
        self.playback = Some(handle);
        Ok(control)
    }

    /// Closes the replay, cancelling any pending tick. Returns whether one
    /// was open.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn close_replay(&mut self) -> bool {
        match self.playback.take() {
            Some(handle) => {
                handle.cancel();
                debug!("Replay closed");
                true
            }
            None => false,
        }
    }
}

/// Manages all game sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
    replay_config: ReplayConfig,
}

impl SessionManager {
    /// Creates a session manager whose replays use `replay_config`.
    #[instrument(skip(replay_config))]
    pub fn new(replay_config: ReplayConfig) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            replay_config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a new game session.
    #[instrument(skip(self, seat_x, seat_o))]
    pub fn create_session(
        &self,
        id: SessionId,
        seat_x: Seat,
        seat_o: Seat,
    ) -> Result<SessionId, SessionError> {
        let mut sessions = self.lock();
        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists(id));
        }

        let session = Session::new(id.clone(), seat_x, seat_o, self.replay_config.clone());
        sessions.insert(id.clone(), session);
        info!(session_id = %id, "Created new session");
        Ok(id)
    }

    /// Runs `f` on a session while holding the lock.
    #[instrument(skip(self, f))]
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(id).ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NotFound(id.to_string())
        })?;
        Ok(f(session))
    }

    /// Plays a move in a session and returns the new state.
    #[instrument(skip(self))]
    pub fn play(&self, id: &str, mov: Move) -> Result<GameState, SessionError> {
        self.with_session(id, |session| session.play(mov).cloned())?
    }

    /// The live state of a session.
    pub fn state(&self, id: &str) -> Result<GameState, SessionError> {
        self.with_session(id, |session| session.game().state().clone())
    }

    /// The move history of a session.
    pub fn history(&self, id: &str) -> Result<MoveHistory, SessionError> {
        self.with_session(id, |session| session.game().history().clone())
    }

    /// Restarts a session's game.
    #[instrument(skip(self))]
    pub fn restart(&self, id: &str) -> Result<(), SessionError> {
        self.with_session(id, Session::restart)
    }

    /// Opens a replay of a finished game.
    #[instrument(skip(self))]
    pub fn open_replay(&self, id: &str) -> Result<PlaybackControl, SessionError> {
        self.with_session(id, Session::open_replay)?
    }

    /// A control for the open replay.
    pub fn replay(&self, id: &str) -> Result<PlaybackControl, SessionError> {
        self.with_session(id, |session| session.playback().map(PlaybackHandle::control))?
            .ok_or(SessionError::NoReplay)
    }

    /// Closes a session's replay.
    #[instrument(skip(self))]
    pub fn close_replay(&self, id: &str) -> Result<bool, SessionError> {
        self.with_session(id, Session::close_replay)
    }

    /// Removes a session, cancelling its replay.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> bool {
        let removed = self.lock().remove(id);
        if let Some(mut session) = removed {
            session.close_replay();
            info!(session_id = id, "Session removed");
            true
        } else {
            false
        }
    }

    /// Lists all session ids.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let ids: Vec<_> = self.lock().keys().cloned().collect();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }
}
