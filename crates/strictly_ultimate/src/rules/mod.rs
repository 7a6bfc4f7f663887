//! Game rules for ultimate tic-tac-toe.
//!
//! This module contains pure functions for evaluating game state.
//! Sub-boards and the macro-board are judged by the same line table,
//! so a sub-board win and a game win mean exactly the same thing.

pub mod draw;
pub mod win;

pub use draw::{is_full, macro_outcome, sub_board_status};
pub use win::{LineMark, LINES, check_line, line_winner};
