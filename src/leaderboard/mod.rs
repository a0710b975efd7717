use actix::prelude::*;
use log::warn;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::models::LeaderboardEntry;

/// How many entries a ranking query returns.
pub const TOP_N: usize = 10;

/// Credit a win to `name` and get back the refreshed ranking.
#[derive(Message)]
#[rtype(result = "Vec<LeaderboardEntry>")]
pub struct RecordWin {
    pub name: String,
}

/// Fetch the current ranking without recording anything.
#[derive(Message)]
#[rtype(result = "Vec<LeaderboardEntry>")]
pub struct FetchTop;

/// Gateway to the external win store: a JSON document of name to win
/// count, keyed by display name and monotonically incremented.
///
/// Runs as its own actor so a store round-trip never holds any lock over
/// the game state. Store failures are logged and play continues; the
/// in-memory counts stay authoritative for the process lifetime.
pub struct LeaderboardStore {
    path: PathBuf,
    wins: HashMap<String, u64>,
}

impl LeaderboardStore {
    /// Read the win document, starting empty when it is missing or
    /// unreadable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let wins = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(wins) => wins,
                Err(e) => {
                    warn!("Ignoring unparseable win store {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!("Cannot read win store {}: {}", path.display(), e);
                HashMap::new()
            }
        };
        LeaderboardStore { path, wins }
    }

    /// Increment the record for `name`, creating it at 1 if absent.
    pub fn record_win(&mut self, name: &str) {
        *self.wins.entry(name.to_string()).or_insert(0) += 1;
        self.persist();
    }

    /// Top `n` records by descending wins. Tie order is whatever the
    /// store happens to yield.
    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .wins
            .iter()
            .map(|(name, wins)| LeaderboardEntry {
                name: name.clone(),
                wins: *wins,
            })
            .collect();
        entries.sort_by(|a, b| b.wins.cmp(&a.wins));
        entries.truncate(n);
        entries
    }

    fn persist(&self) {
        match serde_json::to_string_pretty(&self.wins) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw) {
                    warn!("Failed to write win store {}: {}", self.path.display(), e);
                }
            }
            Err(e) => warn!("Failed to serialize win store: {}", e),
        }
    }
}

impl Actor for LeaderboardStore {
    type Context = Context<Self>;
}

impl Handler<RecordWin> for LeaderboardStore {
    type Result = MessageResult<RecordWin>;

    fn handle(&mut self, msg: RecordWin, _: &mut Context<Self>) -> Self::Result {
        self.record_win(&msg.name);
        MessageResult(self.top(TOP_N))
    }
}

impl Handler<FetchTop> for LeaderboardStore {
    type Result = MessageResult<FetchTop>;

    fn handle(&mut self, _: FetchTop, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.top(TOP_N))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("wins-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn counts_increment_and_rank_descending() {
        let path = scratch_path();
        let mut store = LeaderboardStore::load(&path);
        store.record_win("alice");
        store.record_win("bob");
        store.record_win("alice");

        let top = store.top(TOP_N);
        assert_eq!(top[0].name, "alice");
        assert_eq!(top[0].wins, 2);
        assert_eq!(top[1].name, "bob");
        assert_eq!(top[1].wins, 1);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn ranking_is_capped_at_n() {
        let path = scratch_path();
        let mut store = LeaderboardStore::load(&path);
        for i in 0..15 {
            store.record_win(&format!("player{}", i));
        }
        assert_eq!(store.top(TOP_N).len(), TOP_N);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn counts_survive_a_reload() {
        let path = scratch_path();
        {
            let mut store = LeaderboardStore::load(&path);
            store.record_win("alice");
            store.record_win("alice");
        }
        let store = LeaderboardStore::load(&path);
        assert_eq!(store.top(1), vec![LeaderboardEntry {
            name: "alice".to_string(),
            wins: 2,
        }]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn unparseable_store_starts_empty() {
        let path = scratch_path();
        fs::write(&path, "not json").unwrap();
        let store = LeaderboardStore::load(&path);
        assert!(store.top(TOP_N).is_empty());

        let _ = fs::remove_file(path);
    }

    #[actix_rt::test]
    async fn actor_replies_with_the_refreshed_ranking() {
        let path = scratch_path();
        let store = LeaderboardStore::load(&path).start();

        let top = store
            .send(RecordWin {
                name: "alice".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(top[0].wins, 1);

        let top = store.send(FetchTop).await.unwrap();
        assert_eq!(top[0].name, "alice");

        let _ = fs::remove_file(path);
    }
}
