use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::{rank_and_trim, Result, ScoreRecord};

/// Raw key-value persistence behind the ranking store.
pub trait RankingStorage {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per storage key under a data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Storage under the platform data-local directory.
    pub fn in_data_dir() -> Self {
        let dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("campominato");
        Self::new(dir)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl RankingStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// In-memory storage, mostly for tests.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RankingStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Ordered, bounded score records per game mode.
///
/// Each mode gets its own storage bucket; the stored sequence is replaced
/// in full on every insertion.
pub struct RankingStore<S> {
    storage: S,
}

impl<S: RankingStorage> RankingStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Appends a freshly stamped record, re-ranks, trims, persists, and
    /// returns the updated sequence.
    pub fn record(
        &self,
        mode_key: &str,
        name: &str,
        score: u32,
        duration_secs: u32,
    ) -> Result<Vec<ScoreRecord>> {
        self.insert(mode_key, ScoreRecord::new(name, score, duration_secs))
    }

    pub(crate) fn insert(&self, mode_key: &str, record: ScoreRecord) -> Result<Vec<ScoreRecord>> {
        let mut records = self.fetch(mode_key);
        records.push(record);
        rank_and_trim(&mut records);
        let json = serde_json::to_string(&records)?;
        self.storage.write(&storage_key(mode_key), &json)?;
        Ok(records)
    }

    /// Current sequence for a mode. Missing or unreadable data is an empty
    /// leaderboard, never an error.
    pub fn fetch(&self, mode_key: &str) -> Vec<ScoreRecord> {
        let key = storage_key(mode_key);
        match self.storage.read(&key) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::warn!("discarding corrupt leaderboard {:?}: {}", key, err);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("could not read leaderboard {:?}: {}", key, err);
                Vec::new()
            }
        }
    }
}

fn storage_key(mode_key: &str) -> String {
    format!("leaderboard_{mode_key}")
}
