//! Local key-value preference store
//!
//! Holds exactly one gameplay value today: the last finished run time under
//! [`BEST_TIME_KEY`]. Two stores are provided:
//! - [`MemoryPrefs`] for tests and headless runs
//! - [`FilePrefs`], a JSON object on disk flushed by [`PrefStore::save`]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Preference key for the persisted run time
pub const BEST_TIME_KEY: &str = "BestTime";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Scalar preference storage
pub trait PrefStore: Send {
    fn get_f32(&self, key: &str) -> Option<f32>;

    fn set_f32(&mut self, key: &str, value: f32);

    /// Flush pending writes
    fn save(&mut self) -> Result<(), PrefsError>;
}

/// Volatile store
#[derive(Debug, Default, Clone)]
pub struct MemoryPrefs {
    values: BTreeMap<String, f32>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryPrefs {
    fn get_f32(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    fn set_f32(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), value);
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        Ok(())
    }
}

/// JSON-file store
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, f32>,
    dirty: bool,
}

impl FilePrefs {
    /// Open the store, starting empty if the file is missing
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No preferences at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrefStore for FilePrefs {
    fn get_f32(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    fn set_f32(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        self.dirty = false;
        log::info!("Preferences saved ({} keys)", self.values.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tandem_hop_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_prefs_overwrite() {
        let mut prefs = MemoryPrefs::new();
        assert_eq!(prefs.get_f32(BEST_TIME_KEY), None);
        prefs.set_f32(BEST_TIME_KEY, 12.5);
        prefs.set_f32(BEST_TIME_KEY, 30.0);
        assert_eq!(prefs.get_f32(BEST_TIME_KEY), Some(30.0));
    }

    #[test]
    fn test_file_prefs_persist_across_open() {
        let path = temp_path("prefs_persist");
        let _ = std::fs::remove_file(&path);

        let mut prefs = FilePrefs::open(&path).unwrap();
        prefs.set_f32(BEST_TIME_KEY, 42.25);
        prefs.save().unwrap();

        let reopened = FilePrefs::open(&path).unwrap();
        assert_eq!(reopened.get_f32(BEST_TIME_KEY), Some(42.25));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_prefs_rejects_garbage() {
        let path = temp_path("prefs_garbage");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(FilePrefs::open(&path), Err(PrefsError::Parse(_))));
        let _ = std::fs::remove_file(&path);
    }
}
