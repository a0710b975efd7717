use actix::prelude::*;
use actix_web_actors::ws;
use log::{debug, info, warn};

use crate::game::{Outcome, Symbol};
use crate::leaderboard::{FetchTop, RecordWin};
use crate::models::{ServerMessage, Session};
use crate::state::QueueEntry;
use crate::websocket::handler::GameWebSocket;

impl GameWebSocket {
    /// Register the declared name and let the lobby know. A refused
    /// registration gets a `full` message and the connection is closed,
    /// so the name stays free.
    pub fn handle_join_lobby(&mut self, name: String, ctx: &mut ws::WebsocketContext<Self>) {
        let result = self
            .app_state
            .registry
            .lock()
            .unwrap()
            .register(self.id, &name);

        match result {
            Ok(()) => {
                info!("Player {} joined the lobby", name);
                self.broadcast_roster();
                self.broadcast_games_list();
                self.push_leaderboard_to_lobby(ctx);
            }
            Err(reason) => {
                info!("Connection refused: {}", reason);
                if let Some(text) = Self::encode(&ServerMessage::Full) {
                    ctx.text(text);
                }
                ctx.close(None);
                ctx.stop();
            }
        }
    }

    /// Enqueue the caller for matchmaking. The two oldest entries pair
    /// the moment the queue reaches two; the earlier arrival plays X.
    pub fn handle_start_game(&mut self, requested: String) {
        let name = match self.app_state.registry.lock().unwrap().name_of(self.id) {
            Some(name) => name,
            None => {
                debug!("Matchmaking request from unregistered connection {}", self.id);
                return;
            }
        };
        if requested != name {
            debug!(
                "Matchmaking request named {} but connection is registered as {}",
                requested, name
            );
        }
        if self
            .app_state
            .games
            .lock()
            .unwrap()
            .find_by_conn(self.id)
            .is_some()
        {
            debug!("Player {} asked to queue while already in a game", name);
            return;
        }

        let paired = self.app_state.queue.lock().unwrap().enqueue(QueueEntry {
            id: self.id,
            name: name.clone(),
        });

        match paired {
            Some((first, second)) => {
                let session = self.app_state.games.lock().unwrap().create(first, second);
                info!(
                    "Game started between {} and {}",
                    session.players[0].name, session.players[1].name
                );
                for player in &session.players {
                    if let Some(opponent) = session.peer_of(player.id) {
                        self.send_to(
                            player.id,
                            &ServerMessage::Init {
                                player: player.symbol,
                                board: session.board,
                                opponent_name: opponent.name.clone(),
                            },
                        );
                    }
                }
                self.broadcast_games_list();
            }
            None => {
                let waiting = self.app_state.queue.lock().unwrap().len();
                info!(
                    "Player {} is waiting for an opponent ({} in queue)",
                    name, waiting
                );
            }
        }
    }

    /// Explicit withdrawal from the matchmaking queue.
    pub fn handle_leave(&mut self, name: String) {
        if self.app_state.queue.lock().unwrap().withdraw(self.id) {
            info!("Player {} left the matchmaking queue", name);
        }
    }

    /// Attempt a move on the caller's session. Rejections are dropped
    /// without a reply; the client is expected to filter illegal clicks
    /// and the server re-validates as the authority.
    pub fn handle_move(&mut self, index: usize, player: Symbol) {
        let accepted = {
            let mut games = self.app_state.games.lock().unwrap();
            match games.find_by_conn_mut(self.id) {
                Some(session) => match session.apply_move(player, index) {
                    Ok((board, next_turn)) => Some((session.clone(), board, next_turn)),
                    Err(reason) => {
                        debug!(
                            "{} | Dropping move by {} at index {}: {}",
                            session.id, player, index, reason
                        );
                        None
                    }
                },
                None => {
                    debug!("Move from connection {} outside any session", self.id);
                    None
                }
            }
        };

        if let Some((session, board, next_turn)) = accepted {
            info!("{} | Player {} moved to index {}", session.id, player, index);
            self.broadcast_to_session(
                &session,
                &ServerMessage::Update {
                    board,
                    current_player: next_turn,
                },
            );
            self.finish_if_terminal(&session);
        }
    }

    /// Explicit board reset requested by a session member.
    pub fn handle_reset(&mut self) {
        match self.clear_own_session() {
            Some(session) => {
                info!("{} | Game reset", session.id);
                self.broadcast_to_session(&session, &ServerMessage::Reset { board: session.board });
            }
            None => {
                debug!("Reset from connection {} outside any session", self.id);
            }
        }
    }

    /// Credit the session member holding `player` with a win, then share
    /// the refreshed ranking with the lobby. The store round-trip runs as
    /// an actor future, so no game state lock is held while it is away;
    /// a store failure is logged and play continues.
    pub fn handle_win(&mut self, player: Symbol, ctx: &mut ws::WebsocketContext<Self>) {
        let winner = {
            let games = self.app_state.games.lock().unwrap();
            games
                .find_by_conn(self.id)
                .and_then(|session| session.player_with_symbol(player))
                .map(|p| p.name.clone())
        };
        let winner = match winner {
            Some(name) => name,
            None => {
                debug!("Win claim from connection {} outside any session", self.id);
                return;
            }
        };

        info!("Recording win for {}", winner);
        ctx.spawn(
            self.app_state
                .leaderboard
                .send(RecordWin { name: winner })
                .into_actor(self)
                .then(|result, act, _| {
                    match result {
                        Ok(leaderboard) => {
                            act.broadcast_to_all(&ServerMessage::Leaderboard { leaderboard });
                        }
                        Err(e) => {
                            warn!("Win store unreachable, ranking update skipped: {}", e);
                        }
                    }
                    fut::ready(())
                }),
        );
    }

    /// Close out a decided game: log the outcome and clear the board for
    /// the next round. The winning `update` has already been broadcast.
    fn finish_if_terminal(&self, session: &Session) {
        match session.outcome() {
            Outcome::Win(symbol) => info!("{} | Player {} won", session.id, symbol),
            Outcome::Draw => info!("{} | Game ended in a draw", session.id),
            Outcome::Ongoing => return,
        }
        if let Some(session) = self.clear_own_session() {
            self.broadcast_to_session(&session, &ServerMessage::Reset { board: session.board });
        }
    }

    /// Reset the caller's session board, returning the cleared session.
    fn clear_own_session(&self) -> Option<Session> {
        let mut games = self.app_state.games.lock().unwrap();
        let session = games.find_by_conn_mut(self.id)?;
        session.reset();
        Some(session.clone())
    }

    /// Fetch the ranking and share it with everyone in the lobby.
    fn push_leaderboard_to_lobby(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.spawn(
            self.app_state
                .leaderboard
                .send(FetchTop)
                .into_actor(self)
                .then(|result, act, _| {
                    match result {
                        Ok(leaderboard) => {
                            act.broadcast_to_all(&ServerMessage::Leaderboard { leaderboard });
                        }
                        Err(e) => {
                            warn!("Win store unreachable, ranking update skipped: {}", e);
                        }
                    }
                    fut::ready(())
                }),
        );
    }

    /// Share the current online-player list with everyone in the lobby.
    pub(crate) fn broadcast_roster(&self) {
        let roster = self.app_state.registry.lock().unwrap().roster();
        self.broadcast_to_all(&ServerMessage::OnlinePlayers {
            online_players: roster,
        });
    }

    /// Share the current active-games list with everyone in the lobby.
    pub(crate) fn broadcast_games_list(&self) {
        let games_list = self.app_state.games.lock().unwrap().summaries();
        self.broadcast_to_all(&ServerMessage::GamesList { games_list });
    }
}
