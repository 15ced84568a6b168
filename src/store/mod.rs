//! Keyed JSON storage.
//!
//! Every durable value lives under a string key as JSON text. Per-identity data
//! is namespaced as `<domain>_<ownerId>` (see [`keys`]); the session pointer and
//! the credential list use fixed keys.

pub mod memory;
pub mod sqlite;
#[cfg(test)]
pub(crate) mod test_support;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use anyhow::{Context, Result};
use log::{error, warn};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Raw string storage. Writes are synchronous and visible to the next read;
/// there is no transaction or merge across writers (last write wins).
pub trait KeyedStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("corrupt value under key '{key}': {source}")]
    CorruptData {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::CorruptData {
        key: key.to_string(),
        source,
    })
}

/// Typed JSON helpers available on every [`KeyedStore`].
pub trait KeyedStoreExt {
    /// Reads and decodes `key`. A value that does not decode is deleted and
    /// reported as absent. Storage failures are returned as errors so callers
    /// never mistake an unreadable key for an empty one.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()>;
}

impl<S: KeyedStore + ?Sized> KeyedStoreExt for S {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self
            .get(key)
            .with_context(|| format!("Failed to read '{key}'"))?
        else {
            return Ok(None);
        };

        match decode(key, &raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!("{err}; removing entry");
                if let Err(remove_err) = self.remove(key) {
                    error!("Failed to remove corrupt entry '{key}': {remove_err:#}");
                }
                Ok(None)
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let serialized = serde_json::to_string(value)?;
        self.set(key, &serialized)
    }
}

pub mod keys {
    pub const SESSION: &str = "user";
    pub const CREDENTIALS: &str = "users";

    pub const TASKS: &str = "tasks";
    pub const TIME_BLOCKS: &str = "timeBlocks";
    pub const POMODORO: &str = "pomodoro";

    pub fn owned(domain: &str, owner_id: &str) -> String {
        format!("{domain}_{owner_id}")
    }
}
