use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::Result;

pub const BEST_SCORE_KEY: &str = "bestScore";

/// Key/value persistence for the best score across sessions.
pub trait BestScoreStore {
    fn get_or_default(&self, key: &str) -> u32;
    fn set(&mut self, key: &str, value: u32) -> Result<()>;
}

/// Scores kept as a flat JSON object in a single file.
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, u32>,
}

impl JsonFileStore {
    /// Opens the store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "flappy-face").ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not determine data directory")
        })?;
        Ok(Self::open(dirs.data_dir().join("scores.json")))
    }

    /// Opens the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable score file");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn read(path: &Path) -> io::Result<BTreeMap<String, u32>> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestScoreStore for JsonFileStore {
    fn get_or_default(&self, key: &str) -> u32 {
        self.values.get(key).copied().unwrap_or_default()
    }

    fn set(&mut self, key: &str, value: u32) -> Result<()> {
        self.values.insert(key.to_owned(), value);
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

/// Forgets everything on exit.
#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
}

impl BestScoreStore for MemoryStore {
    fn get_or_default(&self, key: &str) -> u32 {
        self.values.get(key).copied().unwrap_or_default()
    }

    fn set(&mut self, key: &str, value: u32) -> Result<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("scores.json"));
        assert_eq!(store.get_or_default(BEST_SCORE_KEY), 0);
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.json");

        let mut store = JsonFileStore::open(&path);
        store.set(BEST_SCORE_KEY, 17).unwrap();
        assert_eq!(store.get_or_default(BEST_SCORE_KEY), 17);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get_or_default(BEST_SCORE_KEY), 17);
        assert_eq!(reopened.get_or_default("other"), 0);
    }

    #[test]
    fn corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").unwrap();

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.get_or_default(BEST_SCORE_KEY), 0);

        store.set(BEST_SCORE_KEY, 3).unwrap();
        assert_eq!(JsonFileStore::open(&path).get_or_default(BEST_SCORE_KEY), 3);
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::default();
        assert_eq!(store.get_or_default(BEST_SCORE_KEY), 0);
        store.set(BEST_SCORE_KEY, 8).unwrap();
        assert_eq!(store.get_or_default(BEST_SCORE_KEY), 8);
    }
}
