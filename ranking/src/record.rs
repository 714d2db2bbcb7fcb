use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Entries kept per mode; everything ranked below the cutoff is dropped.
pub const MAX_ENTRIES: usize = 10;

/// Name stored when the player leaves the field blank.
pub const DEFAULT_NAME: &str = "Anonimo";

/// One finished game on a leaderboard. Immutable once inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
    pub duration_secs: u32,
    pub timestamp: String,
}

impl ScoreRecord {
    /// Builds a record stamped with the current UTC time.
    pub fn new(name: &str, score: u32, duration_secs: u32) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() {
                DEFAULT_NAME.to_owned()
            } else {
                name.to_owned()
            },
            score,
            duration_secs,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Ranking order: higher score first, faster time breaking ties.
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.duration_secs.cmp(&other.duration_secs))
    }
}

/// Sorts into ranking order and drops everything below the cutoff.
///
/// The sort is stable: records tied on both keys keep their insertion
/// order, though callers should not rely on that beyond the two keys.
pub fn rank_and_trim(records: &mut Vec<ScoreRecord>) {
    records.sort_by(|a, b| a.ranking_cmp(b));
    records.truncate(MAX_ENTRIES);
}
