use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::StoreError;
use crate::models::{Customer, KanbanBoard, UserProfile};

/// The single JSON document everything is persisted in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub kanban: KanbanBoard,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub users: BTreeMap<String, UserProfile>,
    /// Top-level keys written by other tools; carried through every write.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn customer_mut(&mut self, id: &str) -> Option<&mut Customer> {
        self.customers.iter_mut().find(|c| c.id == id)
    }
}

/// A JSON file read and rewritten wholesale on every operation.
///
/// There is no lock around read-modify-write: two overlapping writers race
/// and the later full-document write wins. Each write goes through a
/// temporary sibling file and a rename, so readers see either the old or
/// the new document, never a torn one.
#[derive(Debug)]
pub struct FlatFileStore {
    path: PathBuf,
}

impl FlatFileStore {
    /// Open the store at `path`, writing an empty document if none exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let store = Self {
            path: path.to_path_buf(),
        };
        if !path.exists() {
            store.write(&Document::default())?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Document, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Document::default());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    pub fn write(&self, doc: &Document) -> Result<(), StoreError> {
        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = serde_json::to_string_pretty(doc).map_err(StoreError::Serialize)?;
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "db.json".to_string());
        let tmp = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));
        std::fs::write(&tmp, content).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp);
            write_err(source)
        })
    }
}

/// Async-safe handle to the flat-file store.
///
/// Runs every closure on tokio's blocking pool so file I/O never ties up
/// async worker threads. Closures are not serialised against each other.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<FlatFileStore>,
}

impl StoreHandle {
    pub fn new(store: FlatFileStore) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Run a closure with access to the store on a blocking thread.
    pub async fn call<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&FlatFileStore) -> Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let store = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?
    }

    /// Load the current document.
    pub async fn read(&self) -> Result<Document, StoreError> {
        self.call(|store| store.read()).await
    }

    /// Load, hand the document to `f`, and write it back when `f` asks for it.
    ///
    /// `f` returns `(outcome, dirty)`; nothing is written unless `dirty`.
    pub async fn modify<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Document) -> (R, bool) + Send + 'static,
        R: Send + 'static,
    {
        self.call(move |store| {
            let mut doc = store.read()?;
            let (outcome, dirty) = f(&mut doc);
            if dirty {
                store.write(&doc)?;
            }
            Ok(outcome)
        })
        .await
    }
}
