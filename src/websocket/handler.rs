use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use uuid::Uuid;

use crate::models::{ClientMessage, ServerMessage, Session, WsMessage};
use crate::state::AppState;

/// WebSocket handler for one client connection.
///
/// The id is the connection's only identity; every registry, queue and
/// session structure keys on it.
pub struct GameWebSocket {
    pub id: Uuid,
    pub app_state: web::Data<AppState>,
}

impl Actor for GameWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        // Register the mailbox so broadcasts can reach this connection
        let addr = ctx.address();
        self.app_state.sessions.lock().unwrap().insert(self.id, addr);

        let total_connections = self.app_state.sessions.lock().unwrap().len();
        info!("WebSocket connection started: {}", self.id);
        info!("Total active connections: {}", total_connections);
    }

    /// Disconnect reconciliation. Actix invokes this once per actor no
    /// matter how the transport reported the close; every step below is
    /// keyed to a removal, so a duplicate notification reaches only
    /// no-ops. Order: session cleanup, registry cleanup, lobby broadcast.
    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        // Drop own mailbox first so the lobby broadcasts below skip this
        // connection.
        self.app_state.sessions.lock().unwrap().remove(&self.id);

        let withdrew = self.app_state.queue.lock().unwrap().withdraw(self.id);
        if withdrew {
            info!("Connection {} withdrawn from the matchmaking queue", self.id);
        }

        let ended = {
            let games = self.app_state.games.lock().unwrap();
            games.find_by_conn(self.id).cloned()
        };
        if let Some(session) = &ended {
            if let Some(peer) = session.peer_of(self.id) {
                self.send_to(peer.id, &ServerMessage::OpponentDisconnected);
            }
            self.app_state.games.lock().unwrap().remove_by_conn(self.id);
            info!("{} | Game ended: a player disconnected", session.id);
        }

        let name = self.app_state.registry.lock().unwrap().unregister(self.id);
        if let Some(name) = name {
            info!("Player {} disconnected", name);
            self.broadcast_roster();
            if ended.is_some() {
                self.broadcast_games_list();
            }
        }

        Running::Stop
    }
}

impl Handler<WsMessage> for GameWebSocket {
    type Result = ();

    fn handle(&mut self, msg: WsMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

/// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                self.handle_message(text.to_string(), ctx);
            }
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            _ => {}
        }
    }
}

impl GameWebSocket {
    fn handle_message(&mut self, text: impl AsRef<str>, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::from_str::<ClientMessage>(text.as_ref()) {
            Ok(message) => match message {
                ClientMessage::JoinLobby { name } => self.handle_join_lobby(name, ctx),
                ClientMessage::StartGame { name } => self.handle_start_game(name),
                ClientMessage::Leave { name } => self.handle_leave(name),
                ClientMessage::Move { index, player } => self.handle_move(index, player),
                ClientMessage::Reset => self.handle_reset(),
                ClientMessage::Win { player } => self.handle_win(player, ctx),
            },
            Err(e) => {
                warn!("Dropping malformed message from {}: {}", self.id, e);
            }
        }
    }

    pub(crate) fn encode(message: &ServerMessage) -> Option<String> {
        match serde_json::to_string(message) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to serialize server message: {}", e);
                None
            }
        }
    }

    /// Send a message to a single connection, if it still has a mailbox.
    pub fn send_to(&self, conn: Uuid, message: &ServerMessage) {
        if let Some(text) = Self::encode(message) {
            if let Some(addr) = self.app_state.sessions.lock().unwrap().get(&conn) {
                addr.do_send(WsMessage(text));
            }
        }
    }

    /// Send a message to both members of a session.
    pub fn broadcast_to_session(&self, session: &Session, message: &ServerMessage) {
        if let Some(text) = Self::encode(message) {
            let sessions = self.app_state.sessions.lock().unwrap();
            for player in &session.players {
                if let Some(addr) = sessions.get(&player.id) {
                    addr.do_send(WsMessage(text.clone()));
                }
            }
        }
    }

    /// Send a message to every registered connection. Delivery is
    /// fire-and-forget per recipient; a connection without a live mailbox
    /// is skipped and the rest still receive the message.
    pub fn broadcast_to_all(&self, message: &ServerMessage) {
        if let Some(text) = Self::encode(message) {
            let recipients = self.app_state.registry.lock().unwrap().connection_ids();
            let sessions = self.app_state.sessions.lock().unwrap();
            for conn in recipients {
                if let Some(addr) = sessions.get(&conn) {
                    addr.do_send(WsMessage(text.clone()));
                }
            }
        }
    }
}

/// WebSocket connection handler: every accepted upgrade gets a fresh
/// opaque id and its own actor.
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4();
    info!("New WebSocket connection: {}", id);

    ws::start(
        GameWebSocket {
            id,
            app_state: app_state.clone(),
        },
        &req,
        stream,
    )
}
