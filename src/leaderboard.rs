//! Leaderboard service boundary
//!
//! Storage and retrieval belong to an external scoring service; the core
//! only decides whether a score qualifies for the top N. Unavailability and
//! write failures degrade silently - the score was already awarded locally
//! and a leaderboard write is best-effort.

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_SIZE;
use crate::settings::Difficulty;

/// A single leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub score: u32,
    pub difficulty: Difficulty,
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub date: f64,
}

/// External scoring service contract
///
/// Implementations live outside the core (remote store, local storage).
/// `accepts_name` is where profanity filtering hooks in; a rejected name
/// degrades to skip behavior upstream.
pub trait LeaderboardService {
    /// Whether the backing store is reachable (network, ad-blockers)
    fn is_available(&self) -> bool;

    /// Top entries, descending by score
    fn top_entries(&self, n: usize) -> Vec<Entry>;

    /// Best-effort write; failures are swallowed by the implementation
    fn add_entry(&mut self, entry: Entry);

    /// Display-name filter; defaults to accepting everything
    fn accepts_name(&self, _name: &str) -> bool {
        true
    }
}

/// Whether a score would make the top-N board
///
/// Qualifies when there is room, or when it beats the current last place.
pub fn qualifies(entries: &[Entry], score: u32) -> bool {
    if score == 0 {
        return false;
    }
    if entries.len() < LEADERBOARD_SIZE {
        return true;
    }
    entries
        .get(LEADERBOARD_SIZE - 1)
        .map(|last| score > last.score)
        .unwrap_or(true)
}

/// In-memory service used by tests and the demo binary
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeaderboard {
    entries: Vec<Entry>,
    pub available: bool,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            available: true,
        }
    }
}

impl LeaderboardService for InMemoryLeaderboard {
    fn is_available(&self) -> bool {
        self.available
    }

    fn top_entries(&self, n: usize) -> Vec<Entry> {
        self.entries.iter().take(n).cloned().collect()
    }

    fn add_entry(&mut self, entry: Entry) {
        // Keep sorted descending by score, trimmed to the board size
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(LEADERBOARD_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32) -> Entry {
        Entry {
            name: "AAA".to_string(),
            score,
            difficulty: Difficulty::Normal,
            level: 1,
            date: 0.0,
        }
    }

    #[test]
    fn test_qualifies_with_room() {
        let entries = vec![entry(500)];
        assert!(qualifies(&entries, 10));
        assert!(!qualifies(&entries, 0));
    }

    #[test]
    fn test_qualifies_on_full_board() {
        let mut board = InMemoryLeaderboard::new();
        for score in 1..=LEADERBOARD_SIZE as u32 {
            board.add_entry(entry(score * 100));
        }
        let entries = board.top_entries(LEADERBOARD_SIZE);
        assert_eq!(entries.len(), LEADERBOARD_SIZE);
        assert!(!qualifies(&entries, 100)); // ties with last place lose
        assert!(qualifies(&entries, 101));
    }

    #[test]
    fn test_entries_stay_sorted_and_trimmed() {
        let mut board = InMemoryLeaderboard::new();
        for score in [300, 100, 700, 500, 200, 900, 400, 600, 800, 50, 1000] {
            board.add_entry(entry(score));
        }
        let entries = board.top_entries(LEADERBOARD_SIZE);
        assert_eq!(entries.len(), LEADERBOARD_SIZE);
        assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(entries[0].score, 1000);
        // 50 fell off the board
        assert!(entries.iter().all(|e| e.score != 50));
    }
}
