//! Key-value persistence for tracker collections.
//!
//! Each collection is stored as compact JSON text under a fixed key. Loading
//! never fails: a missing key or unreadable text yields an empty collection
//! and a warning.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

pub const HABITS_KEY: &str = "habits";
pub const PERIODS_KEY: &str = "periods";
pub const SYMPTOMS_KEY: &str = "symptoms";
pub const CYCLE_SETTINGS_KEY: &str = "cycle_settings";
pub const LOG_STREAK_KEY: &str = "log_streak";

/// Textual key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    /// Read a value with a shared lock held
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        tracing::debug!("Read {} bytes from {:?}", contents.len(), path);
        Ok(Some(contents))
    }

    /// Atomically replace a value
    ///
    /// Writes to a temp file in the same directory, syncs it, then renames
    /// it over the old file.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        let temp = NamedTempFile::new_in(&self.dir)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} to {:?}", key, path);
        Ok(())
    }
}

/// Load and deserialize a value, falling back to its default
///
/// Read errors and malformed JSON are logged and swallowed.
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let contents = match store.get(key) {
        Ok(Some(contents)) => contents,
        Ok(None) => {
            tracing::debug!("No stored value for {}, using default", key);
            return T::default();
        }
        Err(e) => {
            tracing::warn!("Failed to read {}: {}. Using default.", key, e);
            return T::default();
        }
    };

    match serde_json::from_str::<T>(&contents) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to parse stored {}: {}. Using default.", key, e);
            T::default()
        }
    }
}

/// Like [`load_or_default`], but distinguishes "nothing stored"
pub fn load_optional<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let contents = match store.get(key) {
        Ok(contents) => contents?,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}. Ignoring.", key, e);
            return None;
        }
    };

    match serde_json::from_str::<T>(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to parse stored {}: {}. Ignoring.", key, e);
            None
        }
    }
}

/// Serialize a value as compact JSON and store it
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let contents = serde_json::to_string(value)?;
    store.set(key, &contents)
}
