//! Per-mode, per-user high score store
//!
//! Scores are tracked per game mode and per user name, persisted as a
//! JSON file. Storage failures are logged and otherwise ignored; the
//! game must keep running with an in-memory board.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sim::GameMode;

/// Read/write contract the game core requires from a score store.
pub trait ScoreStore {
    /// Best known score for a user in a mode; 0 when unknown.
    fn get_highscore(&self, mode: GameMode, user: &str) -> u32;

    /// Store the score iff it beats the current one.
    /// Returns true iff the stored value increased.
    fn save_if_highscore(&mut self, mode: GameMode, user: &str, score: u32) -> bool;

    /// Top `n` (user, score) pairs for a mode, descending by score.
    /// Ties keep insertion order.
    fn top_n(&self, mode: GameMode, n: usize) -> Vec<(String, u32)>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct ScoreEntry {
    user: String,
    score: u32,
}

/// JSON-file backed leaderboard. Entries per mode keep insertion order,
/// which is what breaks score ties in `top_n`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    modes: BTreeMap<String, Vec<ScoreEntry>>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Leaderboard {
    /// Leaderboard with no backing file.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from a JSON file. A missing or unreadable file starts an
    /// empty board; both cases are logged, neither is an error.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut board = match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Leaderboard>(&json) {
                Ok(board) => {
                    log::info!("loaded leaderboard from {}", path.display());
                    board
                }
                Err(e) => {
                    log::warn!("corrupt leaderboard file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no leaderboard at {}, starting fresh", path.display());
                Self::default()
            }
        };
        board.path = Some(path.to_path_buf());
        board
    }

    /// Write the board back to its file, if it has one. Failures are
    /// logged and swallowed.
    pub fn save(&self) {
        let Some(path) = &self.path else { return };
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("failed to save leaderboard to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("failed to serialize leaderboard: {e}"),
        }
    }

    /// Merge an externally supplied snapshot: for each (mode, user),
    /// keep the max of existing vs incoming. Idempotent.
    pub fn merge(&mut self, other: &Leaderboard) {
        for (mode, entries) in &other.modes {
            for entry in entries {
                self.record(mode, &entry.user, entry.score);
            }
        }
        self.save();
    }

    /// Drop all scores for one mode.
    pub fn clear_mode(&mut self, mode: GameMode) {
        self.modes.remove(mode.key());
        self.save();
    }

    /// Drop everything.
    pub fn clear_all(&mut self) {
        self.modes.clear();
        self.save();
    }

    fn record(&mut self, mode_key: &str, user: &str, score: u32) -> bool {
        let entries = self.modes.entry(mode_key.to_string()).or_default();
        match entries.iter_mut().find(|e| e.user == user) {
            Some(entry) => {
                if score > entry.score {
                    entry.score = score;
                    true
                } else {
                    false
                }
            }
            None => {
                entries.push(ScoreEntry {
                    user: user.to_string(),
                    score,
                });
                true
            }
        }
    }
}

impl ScoreStore for Leaderboard {
    fn get_highscore(&self, mode: GameMode, user: &str) -> u32 {
        self.modes
            .get(mode.key())
            .and_then(|entries| entries.iter().find(|e| e.user == user))
            .map(|e| e.score)
            .unwrap_or(0)
    }

    fn save_if_highscore(&mut self, mode: GameMode, user: &str, score: u32) -> bool {
        if user.is_empty() {
            return false;
        }
        let updated = self.record(mode.key(), user, score);
        if updated {
            log::debug!("new {} highscore for {user}: {score}", mode.key());
            self.save();
        }
        updated
    }

    fn top_n(&self, mode: GameMode, n: usize) -> Vec<(String, u32)> {
        let Some(entries) = self.modes.get(mode.key()) else {
            return Vec::new();
        };
        let mut sorted: Vec<&ScoreEntry> = entries.iter().collect();
        // Stable sort keeps insertion order between equal scores
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted
            .into_iter()
            .take(n)
            .map(|e| (e.user.clone(), e.score))
            .collect()
    }
}
