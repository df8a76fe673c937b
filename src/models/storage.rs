use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::models::Snippet;

/// Slot key used by the browser version, kept so existing vaults load as-is.
pub const DEFAULT_SLOT_KEY: &str = "snippetVault_v1";

/// Durable string slots addressed by key. This is the only capability the
/// store needs from its environment.
pub trait KeyValueSlot {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Slots backed by one `<key>.json` file each inside a data directory
#[derive(Debug, Clone)]
pub struct FileSlots {
    data_dir: PathBuf,
}

impl FileSlots {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KeyValueSlot for FileSlots {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StorageError::io(&self.data_dir, e))?;

        let path = self.slot_path(key);
        fs::write(&path, value).map_err(|e| StorageError::io(path, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}

/// In-memory slots, for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    values: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds a slot with raw content, valid or not
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let mut slots = Self::new();
        slots.values.insert(key.to_string(), value.into());
        slots
    }
}

impl KeyValueSlot for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Reads and writes the whole snippet collection as one JSON array in a
/// single slot.
#[derive(Debug)]
pub struct SnippetRepository<S> {
    slots: S,
    key: String,
}

impl<S: KeyValueSlot> SnippetRepository<S> {
    pub fn new(slots: S) -> Self {
        Self::with_key(slots, DEFAULT_SLOT_KEY)
    }

    pub fn with_key(slots: S, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Loads the collection. A missing, unreadable or malformed slot yields an
    /// empty collection. Entries with a blank title or content or a repeated
    /// id are dropped; an `updatedAt` earlier than `createdAt` is raised to it.
    pub fn load(&self) -> Vec<Snippet> {
        let raw = match self.slots.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read snippets, starting empty");
                return Vec::new();
            }
        };

        let snippets: Vec<Snippet> = match serde_json::from_str(&raw) {
            Ok(snippets) => snippets,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored snippets are malformed, starting empty");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let snippets: Vec<Snippet> = snippets
            .into_iter()
            .filter(|snippet| {
                if snippet.title.trim().is_empty() || snippet.content.is_empty() {
                    warn!(id = %snippet.id, "Dropping stored snippet with empty title or content");
                    return false;
                }
                if !seen.insert(snippet.id.clone()) {
                    warn!(id = %snippet.id, "Dropping stored snippet with duplicate id");
                    return false;
                }
                true
            })
            .map(|mut snippet| {
                if snippet.updated_at < snippet.created_at {
                    warn!(id = %snippet.id, "Stored snippet updated before creation, clamping");
                    snippet.updated_at = snippet.created_at;
                }
                snippet
            })
            .collect();

        debug!(key = %self.key, count = snippets.len(), "Loaded snippets");
        snippets
    }

    /// Overwrites the slot with the full collection
    pub fn save(&mut self, snippets: &[Snippet]) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(snippets)?;
        self.slots.set(&self.key, &content)
    }

    /// Removes the slot entirely
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.slots.remove(&self.key)
    }
}
