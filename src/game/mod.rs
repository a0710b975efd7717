use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two markers a player holds for the duration of a session.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// The symbol that moves after this one.
    pub fn opponent(self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::X => write!(f, "X"),
            Symbol::O => write!(f, "O"),
        }
    }
}

/// A cell is empty or holds the symbol that claimed it.
pub type Cell = Option<Symbol>;

/// The 3x3 grid in row-major order.
pub type Board = [Cell; 9];

/// A board with no cell claimed yet.
pub const EMPTY_BOARD: Board = [None; 9];

/// The 8 triples that decide a game: rows, then columns, then diagonals.
/// Scan order is fixed so evaluation is deterministic.
const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of evaluating a board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Symbol),
    Draw,
    Ongoing,
}

/// Evaluate a board for a terminal outcome.
///
/// Returns `Win` for the first fully-claimed line in scan order, `Draw`
/// when every cell is claimed and no line matches, `Ongoing` otherwise.
pub fn evaluate(board: &Board) -> Outcome {
    for line in &WINNING_LINES {
        if let Some(symbol) = board[line[0]] {
            if board[line[1]] == Some(symbol) && board[line[2]] == Some(symbol) {
                return Outcome::Win(symbol);
            }
        }
    }
    if board.iter().all(|cell| cell.is_some()) {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(cells: [&str; 9]) -> Board {
        let mut board = EMPTY_BOARD;
        for (i, cell) in cells.iter().enumerate() {
            board[i] = match *cell {
                "X" => Some(Symbol::X),
                "O" => Some(Symbol::O),
                _ => None,
            };
        }
        board
    }

    #[test]
    fn empty_board_is_ongoing() {
        assert_eq!(evaluate(&EMPTY_BOARD), Outcome::Ongoing);
    }

    #[test]
    fn detects_each_row() {
        for row in 0..3 {
            let mut cells = ["", "", "", "", "", "", "", "", ""];
            for col in 0..3 {
                cells[row * 3 + col] = "X";
            }
            assert_eq!(evaluate(&board_from(cells)), Outcome::Win(Symbol::X));
        }
    }

    #[test]
    fn detects_each_column() {
        for col in 0..3 {
            let mut cells = ["", "", "", "", "", "", "", "", ""];
            for row in 0..3 {
                cells[row * 3 + col] = "O";
            }
            assert_eq!(evaluate(&board_from(cells)), Outcome::Win(Symbol::O));
        }
    }

    #[test]
    fn detects_both_diagonals() {
        let main = board_from(["X", "", "", "", "X", "", "", "", "X"]);
        assert_eq!(evaluate(&main), Outcome::Win(Symbol::X));

        let anti = board_from(["", "", "O", "", "O", "", "O", "", ""]);
        assert_eq!(evaluate(&anti), Outcome::Win(Symbol::O));
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let board = board_from(["X", "O", "X", "X", "O", "O", "O", "X", "X"]);
        assert_eq!(evaluate(&board), Outcome::Draw);
    }

    #[test]
    fn partial_game_is_ongoing() {
        // O at 0 and 2, X at 4, 6 and 8: no line is complete yet.
        let board = board_from(["O", "", "O", "", "X", "", "X", "", "X"]);
        assert_eq!(evaluate(&board), Outcome::Ongoing);
    }

    #[test]
    fn win_beats_draw_on_a_full_board() {
        let board = board_from(["X", "X", "X", "O", "O", "X", "X", "O", "O"]);
        assert_eq!(evaluate(&board), Outcome::Win(Symbol::X));
    }

    #[test]
    fn opponent_alternates() {
        assert_eq!(Symbol::X.opponent(), Symbol::O);
        assert_eq!(Symbol::O.opponent(), Symbol::X);
    }
}
