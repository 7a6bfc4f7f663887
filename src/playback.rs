//! Timed auto-play over a replay cursor.
//!
//! One task owns the [`ReplayCursor`]. Commands and ticks are handled by that
//! task in arrival order, so a manual seek and a scheduled tick can never
//! interleave. Each accepted command reschedules the pending tick from the
//! moment it is handled. A rejected command leaves the schedule alone.

use crate::config::ReplayConfig;
use derive_more::{Display, From};
use strictly_ultimate::{Direction, ReplayCursor, ReplayError};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// A request to change the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Move one step, clamped.
    Step(Direction),
    /// Jump to an index.
    Seek(isize),
    /// Start or stop auto-play.
    SetAutoPlay(bool),
    /// Change the tick interval (already clamped).
    SetInterval(u64),
}

impl PlaybackCommand {
    fn apply(self, cursor: &ReplayCursor) -> Result<ReplayCursor, ReplayError> {
        match self {
            PlaybackCommand::Step(direction) => Ok(cursor.step(direction)),
            PlaybackCommand::Seek(index) => cursor.seek(index),
            PlaybackCommand::SetAutoPlay(on) => Ok(cursor.with_auto_play(on)),
            PlaybackCommand::SetInterval(interval_ms) => cursor.with_interval_ms(interval_ms),
        }
    }
}

struct Request {
    command: PlaybackCommand,
    reply: oneshot::Sender<Result<ReplayCursor, ReplayError>>,
}

/// Playback failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum PlaybackError {
    /// The cursor rejected the command and is unchanged.
    #[display("{}", _0)]
    Replay(ReplayError),
    /// The playback task is no longer running.
    #[from(ignore)]
    #[display("Playback has been shut down")]
    Stopped,
}

impl std::error::Error for PlaybackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlaybackError::Replay(e) => Some(e),
            PlaybackError::Stopped => None,
        }
    }
}

/// Cloneable remote control for a running playback.
#[derive(Debug, Clone)]
pub struct PlaybackControl {
    commands: mpsc::UnboundedSender<Request>,
    cursor: watch::Receiver<ReplayCursor>,
    bounds: ReplayConfig,
}

impl PlaybackControl {
    /// The most recently published cursor.
    pub fn cursor(&self) -> ReplayCursor {
        self.cursor.borrow().clone()
    }

    /// A receiver that observes every published cursor.
    pub fn subscribe(&self) -> watch::Receiver<ReplayCursor> {
        self.cursor.clone()
    }

    /// Steps once in `direction`.
    pub async fn step(&self, direction: Direction) -> Result<ReplayCursor, PlaybackError> {
        self.send(PlaybackCommand::Step(direction)).await
    }

    /// Jumps to `index`. On failure the cursor keeps its position.
    pub async fn seek(&self, index: isize) -> Result<ReplayCursor, PlaybackError> {
        self.send(PlaybackCommand::Seek(index)).await
    }

    /// Starts or stops auto-play.
    pub async fn set_auto_play(&self, on: bool) -> Result<ReplayCursor, PlaybackError> {
        self.send(PlaybackCommand::SetAutoPlay(on)).await
    }

    /// Changes the tick interval, clamped into the configured range.
    pub async fn set_interval_ms(&self, interval_ms: u64) -> Result<ReplayCursor, PlaybackError> {
        let interval_ms = self.bounds.clamp_interval(interval_ms);
        self.send(PlaybackCommand::SetInterval(interval_ms)).await
    }

    /// Waits until auto-play has stopped and returns the cursor.
    pub async fn wait_until_idle(&self) -> Result<ReplayCursor, PlaybackError> {
        let mut rx = self.subscribe();
        let cursor = rx
            .wait_for(|cursor| !cursor.auto_play())
            .await
            .map_err(|_| PlaybackError::Stopped)?;
        Ok(cursor.clone())
    }

    #[instrument(skip(self))]
    async fn send(&self, command: PlaybackCommand) -> Result<ReplayCursor, PlaybackError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Request { command, reply })
            .map_err(|_| PlaybackError::Stopped)?;
        let cursor = response.await.map_err(|_| PlaybackError::Stopped)??;
        Ok(cursor)
    }
}

/// Owner of a playback task.
///
/// Dropping the handle cancels the task, including any pending tick.
#[derive(Debug)]
pub struct PlaybackHandle {
    control: PlaybackControl,
    task: JoinHandle<()>,
}

impl PlaybackHandle {
    /// Spawns the playback task on the current tokio runtime.
    ///
    /// The cursor's interval is replaced by the configured one.
    #[instrument(skip(cursor, config), fields(index = cursor.index(), len = cursor.history().len()))]
    pub fn spawn(cursor: ReplayCursor, config: &ReplayConfig) -> Self {
        let cursor = match cursor.with_interval_ms(config.interval()) {
            Ok(cursor) => cursor,
            Err(e) => {
                warn!(error = %e, "Keeping the cursor's own interval");
                cursor
            }
        };
        let (commands, requests) = mpsc::unbounded_channel();
        let (publisher, receiver) = watch::channel(cursor.clone());
        let task = tokio::spawn(drive(cursor, requests, publisher));
        info!("Playback started");

        Self {
            control: PlaybackControl {
                commands,
                cursor: receiver,
                bounds: config.clone(),
            },
            task,
        }
    }

    /// A cloneable control for this playback.
    pub fn control(&self) -> PlaybackControl {
        self.control.clone()
    }

    /// The most recently published cursor.
    pub fn cursor(&self) -> ReplayCursor {
        self.control.cursor()
    }

    /// Returns true once the task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the task without waiting for it.
    pub fn cancel(&self) {
        debug!("Cancelling playback");
        self.task.abort();
    }

    /// Cancels the task and waits until it has stopped.
    #[instrument(skip(self))]
    pub async fn shutdown(mut self) {
        self.task.abort();
        match (&mut self.task).await {
            Ok(()) => debug!("Playback had already finished"),
            Err(e) if e.is_cancelled() => debug!("Playback cancelled"),
            Err(e) => warn!(error = %e, "Playback task failed"),
        }
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn next_tick(cursor: &ReplayCursor) -> Option<Instant> {
    cursor
        .auto_play()
        .then(|| Instant::now() + Duration::from_millis(cursor.interval_ms()))
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn drive(
    mut cursor: ReplayCursor,
    mut requests: mpsc::UnboundedReceiver<Request>,
    publisher: watch::Sender<ReplayCursor>,
) {
    let mut deadline = next_tick(&cursor);
    loop {
        tokio::select! {
            biased;

            request = requests.recv() => {
                let Some(Request { command, reply }) = request else {
                    debug!("All playback controls dropped");
                    break;
                };
                let result = command.apply(&cursor);
                match &result {
                    Ok(next) => {
                        cursor = next.clone();
                        deadline = next_tick(&cursor);
                        publisher.send_replace(cursor.clone());
                    }
                    Err(e) => warn!(?command, error = %e, "Playback command rejected"),
                }
                let _ = reply.send(result);
            }

            () = sleep_until(deadline) => {
                cursor = cursor.tick();
                debug!(index = cursor.index(), auto_play = cursor.auto_play(), "Tick");
                deadline = next_tick(&cursor);
                publisher.send_replace(cursor.clone());
            }
        }
    }
}
