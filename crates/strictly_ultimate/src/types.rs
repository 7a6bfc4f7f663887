//! Core domain types for ultimate tic-tac-toe.

use super::position::{Coord, Position};
use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Integer code used on the wire (1 = X, 2 = O).
    pub fn code(self) -> u8 {
        match self {
            Player::X => 1,
            Player::O => 2,
        }
    }

    /// Parses a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Player::X),
            2 => Some(Player::O),
            _ => None,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// A cell on the 9x9 board.
///
/// Integer encoding (total): `0` = Empty, `1` = X, `2` = O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a player.
    Occupied(Player),
}

impl Cell {
    /// Integer code of this cell.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(player) => player.code(),
        }
    }

    /// Parses an integer code; anything other than 0, 1 or 2 is rejected.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            other => Player::from_code(other).map(Cell::Occupied),
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(Player::X) => 'X',
            Cell::Occupied(Player::O) => 'O',
        }
    }
}

/// Status of one sub-board.
///
/// Once a sub-board leaves `Open` it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubBoardStatus {
    /// Still playable.
    #[default]
    Open,
    /// A player completed a line inside it.
    WonBy(Player),
    /// Full without a line.
    Drawn,
}

impl SubBoardStatus {
    /// Returns true if moves may still be placed in this sub-board.
    pub fn is_open(self) -> bool {
        matches!(self, SubBoardStatus::Open)
    }
}

/// Outcome of the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    /// Game is ongoing.
    #[default]
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl Outcome {
    /// Returns true once the game has ended.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Won(player) => Some(player),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "In progress"),
            Outcome::Won(player) => write!(f, "Player {} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// 9x9 board: nine 3x3 sub-boards laid out row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; 9]; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cell at the given coordinate.
    pub fn get(&self, coord: Coord) -> Cell {
        self.cells[coord.row()][coord.col()]
    }

    /// Sets the cell at the given coordinate.
    pub(crate) fn set(&mut self, coord: Coord, cell: Cell) {
        self.cells[coord.row()][coord.col()] = cell;
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.get(coord) == Cell::Empty
    }

    /// Returns all rows.
    pub fn rows(&self) -> &[[Cell; 9]; 9] {
        &self.cells
    }

    /// The nine cells of one sub-board, indexed by [`Position`].
    pub fn sub_board(&self, sub_board: Position) -> [Cell; 9] {
        Position::ALL.map(|cell| self.get(Coord::from_parts(sub_board, cell)))
    }

    /// Number of non-empty cells.
    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell != Cell::Empty)
            .count()
    }
}

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) sub_status: [SubBoardStatus; 9],
    pub(crate) current_player: Player,
    pub(crate) active_sub_board: Option<Position>,
    pub(crate) outcome: Outcome,
    pub(crate) last_move: Option<Coord>,
}

impl GameState {
    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Status of every sub-board, indexed by [`Position`].
    pub fn sub_statuses(&self) -> &[SubBoardStatus; 9] {
        &self.sub_status
    }

    /// Status of one sub-board.
    pub fn sub_status(&self, sub_board: Position) -> SubBoardStatus {
        self.sub_status[sub_board.to_index()]
    }

    /// Player to move (frozen once the game is over).
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// The sub-board the mover is confined to, if any.
    pub fn active_sub_board(&self) -> Option<Position> {
        self.active_sub_board
    }

    /// Game outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// The most recent accepted move's cell.
    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    /// Formats the board as a human-readable string.
    ///
    /// Cells of the active sub-board are bracketed.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..9 {
            for col in 0..9 {
                let Some(coord) = Coord::new(row, col) else {
                    continue;
                };
                let symbol = self.board.get(coord).symbol();
                if self.active_sub_board == Some(coord.sub_board()) {
                    result.push('[');
                    result.push(symbol);
                    result.push(']');
                } else {
                    result.push(' ');
                    result.push(symbol);
                    result.push(' ');
                }
                if col % 3 == 2 && col < 8 {
                    result.push_str(" |");
                }
            }
            result.push('\n');
            if row % 3 == 2 && row < 8 {
                result.push_str(&"-".repeat(30));
                result.push('\n');
            }
        }
        if self.outcome.is_terminal() {
            result.push_str(&format!("\nResult: {}\n", self.outcome));
        }
        result
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
