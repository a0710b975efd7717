use std::fmt;
use uuid::Uuid;

use crate::game::{evaluate, Board, Outcome, Symbol, EMPTY_BOARD};

/// One seat of a session: a registered connection bound to a symbol.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub symbol: Symbol,
}

/// Why a move request was dropped. Rejections are never sent back to the
/// client; the reason exists for server-side diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejected {
    OutOfRange,
    CellOccupied,
    NotYourTurn,
}

impl fmt::Display for MoveRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejected::OutOfRange => write!(f, "index out of range"),
            MoveRejected::CellOccupied => write!(f, "cell already occupied"),
            MoveRejected::NotYourTurn => write!(f, "not that player's turn"),
        }
    }
}

/// State for one active two-player game.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub players: [Player; 2],
    pub board: Board,
    pub turn: Symbol,
}

impl Session {
    /// Create a session for a freshly paired couple. The earlier arrival
    /// plays X and X always moves first.
    pub fn new(first: (Uuid, String), second: (Uuid, String)) -> Self {
        Session {
            id: Uuid::new_v4().to_string(),
            players: [
                Player {
                    id: first.0,
                    name: first.1,
                    symbol: Symbol::X,
                },
                Player {
                    id: second.0,
                    name: second.1,
                    symbol: Symbol::O,
                },
            ],
            board: EMPTY_BOARD,
            turn: Symbol::X,
        }
    }

    /// The other player in this session, if `conn` is a member.
    pub fn peer_of(&self, conn: Uuid) -> Option<&Player> {
        if !self.players.iter().any(|p| p.id == conn) {
            return None;
        }
        self.players.iter().find(|p| p.id != conn)
    }

    /// The session member holding `symbol`.
    pub fn player_with_symbol(&self, symbol: Symbol) -> Option<&Player> {
        self.players.iter().find(|p| p.symbol == symbol)
    }

    /// Validate and apply a move for `symbol` at `index`.
    ///
    /// Checked in order: index range, cell vacancy, turn ownership. On
    /// success the cell is claimed, the turn flips, and the new board and
    /// next turn are returned for broadcast. The board and turn are left
    /// untouched on rejection.
    pub fn apply_move(
        &mut self,
        symbol: Symbol,
        index: usize,
    ) -> Result<(Board, Symbol), MoveRejected> {
        if index >= self.board.len() {
            return Err(MoveRejected::OutOfRange);
        }
        if self.board[index].is_some() {
            return Err(MoveRejected::CellOccupied);
        }
        if symbol != self.turn {
            return Err(MoveRejected::NotYourTurn);
        }
        self.board[index] = Some(symbol);
        self.turn = symbol.opponent();
        Ok((self.board, self.turn))
    }

    /// Clear every cell and hand the opening move back to X.
    pub fn reset(&mut self) {
        self.board = EMPTY_BOARD;
        self.turn = Symbol::X;
    }

    /// Evaluate the current board for a terminal outcome.
    pub fn outcome(&self) -> Outcome {
        evaluate(&self.board)
    }
}
