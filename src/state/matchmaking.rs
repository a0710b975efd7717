use std::collections::VecDeque;
use uuid::Uuid;

/// A registered connection waiting for an opponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: Uuid,
    pub name: String,
}

/// FIFO waiting list pairing two connections into a session.
///
/// Pairing is strictly by arrival order; there is no reordering by skill
/// or any other criterion.
#[derive(Default)]
pub struct MatchmakingQueue {
    waiting: VecDeque<QueueEntry>,
}

impl MatchmakingQueue {
    /// Append an entry; when that makes two, both are dequeued and
    /// returned in arrival order (the first becomes X).
    ///
    /// A connection already waiting is not appended twice.
    pub fn enqueue(&mut self, entry: QueueEntry) -> Option<(QueueEntry, QueueEntry)> {
        if self.waiting.iter().any(|waiting| waiting.id == entry.id) {
            return None;
        }
        self.waiting.push_back(entry);
        if self.waiting.len() >= 2 {
            let first = self.waiting.pop_front()?;
            let second = self.waiting.pop_front()?;
            Some((first, second))
        } else {
            None
        }
    }

    /// Remove the entry for `conn` if present; reports whether it was.
    pub fn withdraw(&mut self, conn: Uuid) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|entry| entry.id != conn);
        self.waiting.len() < before
    }

    /// How many connections are currently waiting.
    pub fn len(&self) -> usize {
        self.waiting.len()
    }
}
