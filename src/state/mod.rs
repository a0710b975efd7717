pub mod matchmaking;
pub mod registry;
pub mod session_store;

pub use matchmaking::{MatchmakingQueue, QueueEntry};
pub use registry::{ConnectionRegistry, RegistrationError};
pub use session_store::SessionStore;

use actix::Addr;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::leaderboard::LeaderboardStore;
use crate::websocket::GameWebSocket;

/// Application state shared between connections.
///
/// The registry, queue and game store are process-wide mutable state with
/// no persistence; handlers take one lock at a time and release it before
/// broadcasting. `sessions` maps connection ids to live actor mailboxes
/// for the fan-out paths.
pub struct AppState {
    pub registry: Mutex<ConnectionRegistry>,
    pub queue: Mutex<MatchmakingQueue>,
    pub games: Mutex<SessionStore>,
    pub sessions: Mutex<HashMap<Uuid, Addr<GameWebSocket>>>,
    pub leaderboard: Addr<LeaderboardStore>,
}

impl AppState {
    pub fn new(leaderboard: Addr<LeaderboardStore>) -> Self {
        AppState {
            registry: Mutex::new(ConnectionRegistry::default()),
            queue: Mutex::new(MatchmakingQueue::default()),
            games: Mutex::new(SessionStore::default()),
            sessions: Mutex::new(HashMap::new()),
            leaderboard,
        }
    }
}
