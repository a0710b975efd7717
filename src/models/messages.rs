use actix::Message;
use serde::{Deserialize, Serialize};

use crate::game::{Board, Symbol};

/// Message sent from client to server, discriminated by the `type` field.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Register a display name and enter the lobby.
    JoinLobby { name: String },
    /// Ask to be paired into a game.
    StartGame { name: String },
    /// Withdraw from the matchmaking queue.
    Leave { name: String },
    /// Claim a cell on the caller's session board.
    Move { index: usize, player: Symbol },
    /// Clear the caller's session board.
    Reset,
    /// Credit the session member holding `player` with a win.
    Win { player: Symbol },
}

/// Message sent from server to client, discriminated by the `type` field.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Session created; tells the client its symbol and opponent.
    #[serde(rename_all = "camelCase")]
    Init {
        player: Symbol,
        board: Board,
        opponent_name: String,
    },
    /// A move was accepted; carries the new state.
    #[serde(rename_all = "camelCase")]
    Update { board: Board, current_player: Symbol },
    /// The session board was cleared.
    Reset { board: Board },
    /// The peer's connection closed; the session is gone.
    OpponentDisconnected,
    /// Registration was rejected (duplicate or empty name).
    Full,
    /// Current top-N ranking from the win store.
    Leaderboard { leaderboard: Vec<LeaderboardEntry> },
    /// Snapshot of every registered player.
    #[serde(rename_all = "camelCase")]
    OnlinePlayers { online_players: Vec<OnlinePlayer> },
    /// Snapshot of every active session.
    #[serde(rename_all = "camelCase")]
    GamesList { games_list: Vec<GameSummary> },
}

/// One row of the leaderboard ranking.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub wins: u64,
}

/// One entry of the online-player list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OnlinePlayer {
    pub name: String,
}

/// One entry of the active-games list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub player1: String,
    pub player2: String,
}

/// Message type for WebSocket communication between actors.
#[derive(Message)]
#[rtype(result = "()")]
pub struct WsMessage(pub String);
