use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{GameSummary, Session};
use crate::state::matchmaking::QueueEntry;

/// Owns the authoritative game state for every active session.
///
/// A membership index maps each member connection to its session id, so
/// in-game messages, which identify the player only by connection, resolve
/// in O(1).
#[derive(Default)]
pub struct SessionStore {
    games: HashMap<String, Session>,
    membership: HashMap<Uuid, String>,
}

impl SessionStore {
    /// Create a session for a freshly dequeued pair and return a copy for
    /// the init broadcast. The earlier arrival plays X.
    pub fn create(&mut self, first: QueueEntry, second: QueueEntry) -> Session {
        let session = Session::new((first.id, first.name), (second.id, second.name));
        self.membership
            .insert(session.players[0].id, session.id.clone());
        self.membership
            .insert(session.players[1].id, session.id.clone());
        self.games.insert(session.id.clone(), session.clone());
        session
    }

    /// The session `conn` belongs to, if any.
    pub fn find_by_conn(&self, conn: Uuid) -> Option<&Session> {
        let id = self.membership.get(&conn)?;
        self.games.get(id)
    }

    /// Mutable access to the session `conn` belongs to.
    pub fn find_by_conn_mut(&mut self, conn: Uuid) -> Option<&mut Session> {
        let id = self.membership.get(&conn)?;
        self.games.get_mut(id)
    }

    /// Tear down the session `conn` belongs to, clearing both membership
    /// entries. Idempotent: a second call for the same connection is a
    /// no-op returning `None`.
    pub fn remove_by_conn(&mut self, conn: Uuid) -> Option<Session> {
        let id = self.membership.remove(&conn)?;
        let session = self.games.remove(&id)?;
        for player in &session.players {
            self.membership.remove(&player.id);
        }
        Some(session)
    }

    /// Snapshot of the active-games list for the lobby.
    pub fn summaries(&self) -> Vec<GameSummary> {
        let mut summaries: Vec<GameSummary> = self
            .games
            .values()
            .map(|session| GameSummary {
                player1: session.players[0].name.clone(),
                player2: session.players[1].name.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| a.player1.cmp(&b.player1));
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Symbol;
    use crate::models::MoveRejected;

    fn pair(a: &str, b: &str) -> (QueueEntry, QueueEntry) {
        (
            QueueEntry {
                id: Uuid::new_v4(),
                name: a.to_string(),
            },
            QueueEntry {
                id: Uuid::new_v4(),
                name: b.to_string(),
            },
        )
    }

    #[test]
    fn both_members_resolve_to_the_same_session() {
        let mut store = SessionStore::default();
        let (alice, bob) = pair("alice", "bob");
        let (alice_id, bob_id) = (alice.id, bob.id);
        let session = store.create(alice, bob);

        assert_eq!(store.find_by_conn(alice_id).map(|s| &s.id), Some(&session.id));
        assert_eq!(store.find_by_conn(bob_id).map(|s| &s.id), Some(&session.id));
        assert!(store.find_by_conn(Uuid::new_v4()).is_none());
    }

    #[test]
    fn moves_mutate_the_stored_session() {
        let mut store = SessionStore::default();
        let (alice, bob) = pair("alice", "bob");
        let bob_id = bob.id;
        store.create(alice, bob);

        let session = store.find_by_conn_mut(bob_id).unwrap();
        session.apply_move(Symbol::X, 4).unwrap();
        assert_eq!(
            session.apply_move(Symbol::X, 5),
            Err(MoveRejected::NotYourTurn)
        );

        let session = store.find_by_conn(bob_id).unwrap();
        assert_eq!(session.board[4], Some(Symbol::X));
        assert_eq!(session.turn, Symbol::O);
    }

    #[test]
    fn removal_clears_membership_for_both_players() {
        let mut store = SessionStore::default();
        let (alice, bob) = pair("alice", "bob");
        let (alice_id, bob_id) = (alice.id, bob.id);
        store.create(alice, bob);

        let removed = store.remove_by_conn(alice_id).unwrap();
        assert_eq!(removed.players[0].name, "alice");
        assert!(store.summaries().is_empty());
        // the survivor no longer resolves: later moves are session-not-found
        assert!(store.find_by_conn(bob_id).is_none());
        // duplicate close notifications reach a no-op
        assert!(store.remove_by_conn(alice_id).is_none());
    }

    #[test]
    fn summaries_snapshot_active_pairings() {
        let mut store = SessionStore::default();
        let (alice, bob) = pair("alice", "bob");
        store.create(alice, bob);
        let (carol, dave) = pair("carol", "dave");
        store.create(carol, dave);

        let summaries = store.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].player1, "alice");
        assert_eq!(summaries[0].player2, "bob");
        assert_eq!(summaries[1].player1, "carol");
    }
}
