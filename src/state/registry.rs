use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::models::OnlinePlayer;

/// Why a registration attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationError {
    EmptyName,
    NameInUse,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::EmptyName => write!(f, "name is missing"),
            RegistrationError::NameInUse => write!(f, "name is already taken"),
        }
    }
}

/// Tracks every live connection and its declared display name.
///
/// Names are unique among currently registered connections only; a name
/// becomes available again the moment its connection unregisters.
#[derive(Default)]
pub struct ConnectionRegistry {
    names: HashMap<Uuid, String>,
}

impl ConnectionRegistry {
    /// Associate `conn` with `name` for the lifetime of the connection.
    ///
    /// The duplicate check is case-sensitive and skips `conn` itself, so a
    /// connection may re-announce its own name without tripping over it.
    pub fn register(&mut self, conn: Uuid, name: &str) -> Result<(), RegistrationError> {
        if name.trim().is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if self.names.iter().any(|(id, n)| *id != conn && n == name) {
            return Err(RegistrationError::NameInUse);
        }
        self.names.insert(conn, name.to_string());
        Ok(())
    }

    /// Idempotent removal; returns the name that was registered, if any.
    pub fn unregister(&mut self, conn: Uuid) -> Option<String> {
        self.names.remove(&conn)
    }

    /// The display name registered for `conn`.
    pub fn name_of(&self, conn: Uuid) -> Option<String> {
        self.names.get(&conn).cloned()
    }

    /// Connection ids of everyone currently registered, the recipient set
    /// for lobby-wide broadcasts.
    pub fn connection_ids(&self) -> Vec<Uuid> {
        self.names.keys().copied().collect()
    }

    /// Snapshot of the online-player list for the lobby.
    pub fn roster(&self) -> Vec<OnlinePlayer> {
        let mut roster: Vec<OnlinePlayer> = self
            .names
            .values()
            .map(|name| OnlinePlayer { name: name.clone() })
            .collect();
        roster.sort_by(|a, b| a.name.cmp(&b.name));
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_and_lists_a_name() {
        let mut registry = ConnectionRegistry::default();
        let conn = Uuid::new_v4();
        registry.register(conn, "alice").unwrap();
        assert_eq!(registry.name_of(conn).as_deref(), Some("alice"));
        assert_eq!(registry.roster().len(), 1);
    }

    #[test]
    fn rejects_blank_names() {
        let mut registry = ConnectionRegistry::default();
        assert_eq!(
            registry.register(Uuid::new_v4(), ""),
            Err(RegistrationError::EmptyName)
        );
        assert_eq!(
            registry.register(Uuid::new_v4(), "   "),
            Err(RegistrationError::EmptyName)
        );
    }

    #[test]
    fn rejects_a_name_held_by_another_connection() {
        let mut registry = ConnectionRegistry::default();
        registry.register(Uuid::new_v4(), "alice").unwrap();
        assert_eq!(
            registry.register(Uuid::new_v4(), "alice"),
            Err(RegistrationError::NameInUse)
        );
    }

    #[test]
    fn duplicate_check_is_case_sensitive() {
        let mut registry = ConnectionRegistry::default();
        registry.register(Uuid::new_v4(), "alice").unwrap();
        assert!(registry.register(Uuid::new_v4(), "Alice").is_ok());
    }

    #[test]
    fn name_frees_up_after_unregister() {
        let mut registry = ConnectionRegistry::default();
        let first = Uuid::new_v4();
        registry.register(first, "alice").unwrap();
        assert_eq!(registry.unregister(first).as_deref(), Some("alice"));
        assert!(registry.register(Uuid::new_v4(), "alice").is_ok());
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut registry = ConnectionRegistry::default();
        let conn = Uuid::new_v4();
        registry.register(conn, "alice").unwrap();
        assert!(registry.unregister(conn).is_some());
        assert!(registry.unregister(conn).is_none());
    }

    #[test]
    fn a_connection_may_reannounce_its_own_name() {
        let mut registry = ConnectionRegistry::default();
        let conn = Uuid::new_v4();
        registry.register(conn, "alice").unwrap();
        assert!(registry.register(conn, "alice").is_ok());
        assert_eq!(registry.roster().len(), 1);
    }
}
