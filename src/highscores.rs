//! High score leaderboard system
//!
//! Persisted to a key/value store (LocalStorage on web), tracks top 10 scores.
//! Storage failures never reach the game: the board keeps working in memory
//! and reports `StorageStatus::Unavailable`.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;
use crate::platform::time::{date_label, now_ms};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// Longest accepted player name (characters)
pub const MAX_NAME_LEN: usize = 20;
pub const DEFAULT_NAME: &str = "Anonymous";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub player_name: String,
    /// Seconds survived, rounded to 0.1
    pub score: f32,
    /// Human readable date
    pub date: String,
    /// Unix timestamp (ms) when achieved
    #[serde(default)]
    pub timestamp_ms: f64,
}

/// Whether the backing store is usable
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StorageStatus {
    #[default]
    Available,
    /// Scores are kept for this session only
    Unavailable(String),
}

/// Score collaborator the session reports finished runs to
pub trait Leaderboard {
    /// Would `score` make the board?
    fn is_high_score(&self, score: f32) -> bool;
    /// Record a score; returns its rank (1-indexed) if it stayed on the board
    fn add_score(&mut self, name: &str, score: f32) -> Option<usize>;
    /// Entries, best first
    fn entries(&self) -> &[LeaderboardEntry];
    fn clear(&mut self);
}

/// Round seconds to one decimal place
pub fn round_score(score: f32) -> f32 {
    (score * 10.0).round() / 10.0
}

/// Trim, cap at `MAX_NAME_LEN` characters, fall back to `DEFAULT_NAME`
pub fn sanitize_name(name: &str) -> String {
    let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Leaderboard persisted as JSON in a key/value store
pub struct LocalLeaderboard<S: KeyValueStore> {
    store: S,
    entries: Vec<LeaderboardEntry>,
    status: StorageStatus,
    clock: fn() -> f64,
}

impl<S: KeyValueStore> LocalLeaderboard<S> {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "hexagon-leaderboard";

    /// Load the board from `store` (an unreadable board starts empty)
    pub fn load(store: S) -> Self {
        let mut board = Self {
            store,
            entries: Vec::new(),
            status: StorageStatus::Available,
            clock: now_ms,
        };

        match board.store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<LeaderboardEntry>>(&json) {
                Ok(mut entries) => {
                    sort_entries(&mut entries);
                    entries.truncate(MAX_HIGH_SCORES);
                    log::info!("Loaded {} high scores", entries.len());
                    board.entries = entries;
                }
                Err(e) => log::warn!("Failed to parse leaderboard, starting fresh: {e}"),
            },
            Ok(None) => log::info!("No high scores found, starting fresh"),
            Err(e) => {
                log::warn!("Leaderboard storage unavailable: {e}");
                board.status = StorageStatus::Unavailable(e.to_string());
            }
        }

        board
    }

    /// Replace the timestamp source (tests, replays)
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    pub fn status(&self) -> &StorageStatus {
        &self.status
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.store
                    .set(Self::STORAGE_KEY, &json)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => {
                self.status = StorageStatus::Available;
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
            Err(e) => {
                log::warn!("Failed to save high scores: {e}");
                self.status = StorageStatus::Unavailable(e);
            }
        }
    }
}

/// Descending by score; ties keep insertion order
fn sort_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

impl<S: KeyValueStore> Leaderboard for LocalLeaderboard<S> {
    fn is_high_score(&self, score: f32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    fn add_score(&mut self, name: &str, score: f32) -> Option<usize> {
        let timestamp_ms = (self.clock)();
        let entry = LeaderboardEntry {
            id: format!("{}", timestamp_ms as u64),
            player_name: sanitize_name(name),
            score: round_score(score),
            date: date_label(timestamp_ms),
            timestamp_ms,
        };
        let id = entry.id.clone();

        self.entries.push(entry);
        sort_entries(&mut self.entries);
        self.entries.truncate(MAX_HIGH_SCORES);
        self.persist();

        self.entries
            .iter()
            .rposition(|e| e.id == id)
            .map(|i| i + 1)
    }

    fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.remove(Self::STORAGE_KEY) {
            log::warn!("Failed to clear high scores: {e}");
            self.status = StorageStatus::Unavailable(e.to_string());
        }
    }
}
