//! Store doubles for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{bail, Result};

use super::{KeyedStore, MemoryStore};

/// A [`MemoryStore`] whose next `n` reads fail, as a locked SQLite file would.
#[derive(Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    failing_reads: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_next_reads(&self, count: usize) {
        self.failing_reads.store(count, Ordering::SeqCst);
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}

impl KeyedStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let failed = self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                left.checked_sub(1)
            })
            .is_ok();
        if failed {
            bail!("database is locked");
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}
