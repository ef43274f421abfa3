//! Key/value persistence for client stores that survive restarts.
//!
//! Each store is saved under a fixed storage key as one JSON file in the
//! storage directory. Missing or unreadable entries fall back to the
//! store's default.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::ClientSection;

/// A directory of `<key>.json` files.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &ClientSection) -> Self {
        Self::new(config.storage_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Load the value under `key`, or `None` if absent or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read stored state, using defaults");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored state is corrupt, using defaults");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create storage dir {}", self.dir.display()))?;
        let content = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {}", key))?;
        let path = self.entry_path(key);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

/// A store whose state is kept in [`LocalStorage`].
pub trait Persisted: Serialize + DeserializeOwned + Default {
    const STORAGE_KEY: &'static str;
}

/// Wraps a persisted store and writes it back after every mutation.
#[derive(Debug)]
pub struct Persistent<S: Persisted> {
    state: S,
    storage: LocalStorage,
}

impl<S: Persisted> Persistent<S> {
    /// Rehydrate from storage, or start from `S::default()`.
    pub fn load(storage: LocalStorage) -> Self {
        let state = storage.get(S::STORAGE_KEY).unwrap_or_default();
        Self { state, storage }
    }

    /// Run a mutation and save the result.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> Result<R> {
        let out = f(&mut self.state);
        self.save()?;
        Ok(out)
    }

    /// Mutable access without saving; pair with [`Persistent::save`].
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn save(&self) -> Result<()> {
        self.storage.set(S::STORAGE_KEY, &self.state)
    }

    pub fn into_inner(self) -> S {
        self.state
    }
}

impl<S: Persisted> Deref for Persistent<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.state
    }
}
