//! Payloads exchanged with the authoritative game service.
//!
//! The service speaks integer codes: cells are `0` empty, `1` X, `2` O;
//! sub-board statuses add `3` for drawn; the winner field uses `3` for a
//! drawn game. Conversions here are the only place those codes appear.

use super::action::{Move, RejectReason};
use super::engine::apply_move;
use super::{Board, Cell, Coord, GameState, MoveHistory, Outcome, Player, Position, SubBoardStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

const DRAW_CODE: u8 = 3;

/// A malformed payload from the service.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum WireError {
    /// A grid had the wrong number of rows or columns.
    #[display("{} must be {}x{}", grid, size, size)]
    Shape {
        /// Which grid.
        grid: &'static str,
        /// Expected side length.
        size: usize,
    },

    /// A code outside the documented range.
    #[display("Invalid {} code {} at ({}, {})", grid, code, row, col)]
    BadCode {
        /// Which grid.
        grid: &'static str,
        /// Row of the bad entry.
        row: usize,
        /// Column of the bad entry.
        col: usize,
        /// The offending code.
        code: u8,
    },

    /// A player code other than 1 or 2.
    #[display("Unknown player code {}", _0)]
    UnknownPlayer(u8),

    /// A winner code other than 1, 2 or 3.
    #[display("Unknown winner code {}", _0)]
    UnknownWinner(u8),

    /// A coordinate that cannot be a board cell at all.
    #[display("Invalid coordinate [{}, {}]", _0, _1)]
    BadCoordinate(i64, i64),
}

impl std::error::Error for WireError {}

/// Outbound "propose move" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Board row.
    pub row: usize,
    /// Board column.
    pub col: usize,
}

impl From<Coord> for MoveRequest {
    fn from(coord: Coord) -> Self {
        Self {
            row: coord.row(),
            col: coord.col(),
        }
    }
}

/// Game state as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteState {
    /// 9x9 cell codes.
    pub board: Vec<Vec<u8>>,
    /// 3x3 sub-board status codes.
    pub mainboard: Vec<Vec<u8>>,
    /// Player to move.
    pub current_player: u8,
    /// Winner code, absent while the game is running.
    #[serde(default)]
    pub winner: Option<u8>,
    /// Last accepted move.
    #[serde(default)]
    pub last_move: Option<[i64; 2]>,
}

impl TryFrom<RemoteState> for GameState {
    type Error = WireError;

    #[instrument(skip(remote), name = "remote_state_to_game_state")]
    fn try_from(remote: RemoteState) -> Result<Self, Self::Error> {
        let mut board = Board::new();
        for (row, col, code) in grid_entries(&remote.board, "board", 9)? {
            let cell = Cell::from_code(code).ok_or(WireError::BadCode {
                grid: "board",
                row,
                col,
                code,
            })?;
            if let Some(coord) = Coord::new(row, col) {
                board.set(coord, cell);
            }
        }

        let mut sub_status = [SubBoardStatus::Open; 9];
        for (row, col, code) in grid_entries(&remote.mainboard, "mainboard", 3)? {
            let status = match code {
                0 => SubBoardStatus::Open,
                DRAW_CODE => SubBoardStatus::Drawn,
                other => SubBoardStatus::WonBy(Player::from_code(other).ok_or(WireError::BadCode {
                    grid: "mainboard",
                    row,
                    col,
                    code,
                })?),
            };
            sub_status[row * 3 + col] = status;
        }

        let current_player =
            Player::from_code(remote.current_player).ok_or(WireError::UnknownPlayer(remote.current_player))?;

        let outcome = match remote.winner {
            None | Some(0) => Outcome::InProgress,
            Some(DRAW_CODE) => Outcome::Draw,
            Some(code) => Outcome::Won(Player::from_code(code).ok_or(WireError::UnknownWinner(code))?),
        };

        let last_move = remote.last_move.map(parse_coord).transpose()?;
        let active_sub_board = match (outcome, last_move) {
            (Outcome::InProgress, Some(coord)) => {
                Some(coord.local()).filter(|target| sub_status[target.to_index()].is_open())
            }
            _ => None,
        };

        Ok(GameState {
            board,
            sub_status,
            current_player,
            active_sub_board,
            outcome,
            last_move,
        })
    }
}

impl From<&GameState> for RemoteState {
    fn from(state: &GameState) -> Self {
        let board = state
            .board()
            .rows()
            .iter()
            .map(|row| row.iter().map(|cell| cell.code()).collect())
            .collect();
        let mainboard = (0..3)
            .map(|row| {
                (0..3)
                    .map(|col| status_code(state.sub_statuses()[row * 3 + col]))
                    .collect()
            })
            .collect();

        Self {
            board,
            mainboard,
            current_player: state.current_player().code(),
            winner: outcome_code(state.outcome()),
            last_move: state
                .last_move()
                .map(|coord| [wire_index(coord.row()), wire_index(coord.col())]),
        }
    }
}

fn grid_entries(
    grid: &[Vec<u8>],
    name: &'static str,
    size: usize,
) -> Result<Vec<(usize, usize, u8)>, WireError> {
    let shape = WireError::Shape { grid: name, size };
    if grid.len() != size || grid.iter().any(|row| row.len() != size) {
        return Err(shape);
    }
    Ok(grid
        .iter()
        .enumerate()
        .flat_map(|(row, cells)| cells.iter().enumerate().map(move |(col, code)| (row, col, *code)))
        .collect())
}

fn parse_coord([row, col]: [i64; 2]) -> Result<Coord, WireError> {
    usize::try_from(row)
        .ok()
        .zip(usize::try_from(col).ok())
        .and_then(|(r, c)| Coord::new(r, c))
        .ok_or(WireError::BadCoordinate(row, col))
}

fn status_code(status: SubBoardStatus) -> u8 {
    match status {
        SubBoardStatus::Open => 0,
        SubBoardStatus::WonBy(player) => player.code(),
        SubBoardStatus::Drawn => DRAW_CODE,
    }
}

/// Winner code for an outcome (`None` while in progress).
pub fn outcome_code(outcome: Outcome) -> Option<u8> {
    match outcome {
        Outcome::InProgress => None,
        Outcome::Won(player) => Some(player.code()),
        Outcome::Draw => Some(DRAW_CODE),
    }
}

/// Reply to a proposed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteResponse {
    /// `{ "success": false, "error": "..." }`
    Rejected {
        /// The service's message.
        error: String,
    },
    /// `{ "success": true, ...state }`
    Accepted(RemoteState),
}

/// A reply mapped onto local types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveVerdict {
    /// The service accepted the move; this is its new state.
    Accepted(GameState),
    /// The service rejected the move.
    Rejected(RejectReason),
}

impl RemoteResponse {
    /// Maps the reply for `request`, proposed from `mirror`.
    #[instrument(skip(self, mirror))]
    pub fn resolve(self, mirror: &GameState, request: MoveRequest) -> Result<MoveVerdict, WireError> {
        match self {
            RemoteResponse::Accepted(remote) => Ok(MoveVerdict::Accepted(remote.try_into()?)),
            RemoteResponse::Rejected { error } => Ok(MoveVerdict::Rejected(map_rejection(
                mirror, request, &error,
            ))),
        }
    }
}

/// Maps a rejection message onto [`RejectReason`].
///
/// The proposed move is first re-checked against the local mirror, which
/// yields a precise reason whenever the mirror agrees with the service.
/// Otherwise the message is matched by keyword; unrecognised messages
/// become [`RejectReason::Remote`].
#[instrument(skip(mirror))]
pub fn map_rejection(mirror: &GameState, request: MoveRequest, message: &str) -> RejectReason {
    let mover = mirror.current_player();
    if let Err(reason) = apply_move(mirror, Move::new(mover, request.row, request.col)) {
        debug!(%reason, "Local mirror explains the rejection");
        return reason;
    }

    let text = message.to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|word| !word.is_empty())
        .collect();
    let has = |word: &str| words.contains(&word);
    let coord = Coord::new(request.row, request.col);
    let reason = if has("over") || has("finished") {
        Some(RejectReason::GameAlreadyOver)
    } else if has("turn") {
        Some(RejectReason::WrongPlayer {
            expected: mover.opponent(),
            attempted: mover,
        })
    } else if has("bounds") || text.contains("off the board") {
        Some(RejectReason::OutOfBounds {
            row: request.row,
            col: request.col,
        })
    } else if has("occupied") {
        coord.map(RejectReason::CellOccupied)
    } else if has("closed") {
        coord.map(|c| RejectReason::SubBoardClosed(c.sub_board()))
    } else if has("sub-board") || has("subboard") || has("mini") {
        coord.map(|c| RejectReason::WrongSubBoard {
            required: mirror.active_sub_board().unwrap_or(Position::Center),
            attempted: c.sub_board(),
        })
    } else {
        None
    };

    reason.unwrap_or_else(|| {
        warn!(message, "Unrecognised rejection from server");
        RejectReason::Remote(message.to_string())
    })
}

/// Saturates at `i64::MAX` rather than wrapping negative.
fn wire_index(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// One entry of a completed game's move log: `{ "player": 1, "move": [r, c] }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLogEntry {
    /// Player code.
    pub player: u8,
    /// `[row, col]`.
    #[serde(rename = "move")]
    pub at: [i64; 2],
}

impl From<&Move> for MoveLogEntry {
    fn from(mov: &Move) -> Self {
        Self {
            player: mov.player.code(),
            at: [wire_index(mov.row), wire_index(mov.col)],
        }
    }
}

impl TryFrom<MoveLogEntry> for Move {
    type Error = WireError;

    fn try_from(entry: MoveLogEntry) -> Result<Self, Self::Error> {
        let player = Player::from_code(entry.player).ok_or(WireError::UnknownPlayer(entry.player))?;
        let [row, col] = entry.at;
        let bad = WireError::BadCoordinate(row, col);
        let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
            return Err(bad);
        };
        // Positive out-of-range cells are kept; replay reports them.
        Ok(Move::new(player, row, col))
    }
}

/// Full move log of a completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLog {
    /// Moves in order.
    pub move_history: Vec<MoveLogEntry>,
    /// Winner code.
    #[serde(default)]
    pub winner: Option<u8>,
}

impl MatchLog {
    /// Builds a log from a history and its outcome.
    pub fn new(history: &MoveHistory, outcome: Outcome) -> Self {
        Self {
            move_history: history.iter().map(MoveLogEntry::from).collect(),
            winner: outcome_code(outcome),
        }
    }

    /// Converts the log into a history ready for replay.
    #[instrument(skip(self), fields(len = self.move_history.len()))]
    pub fn to_history(&self) -> Result<MoveHistory, WireError> {
        self.move_history
            .iter()
            .map(|entry| Move::try_from(*entry))
            .collect()
    }
}
