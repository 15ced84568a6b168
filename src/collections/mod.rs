//! Per-identity record lists mirrored to the keyed store.
//!
//! Each collection holds the records of exactly one owner (or none while
//! signed out) and rewrites the whole list under `<domain>_<ownerId>` after
//! every mutation.

pub mod tasks;
pub mod time_blocks;

pub use tasks::{TaskCollection, TaskStats};
pub use time_blocks::TimeBlockCollection;

use std::sync::Arc;

use log::{debug, error, warn};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
    events::{Listeners, SubscriptionId},
    store::{keys, KeyedStore, KeyedStoreExt},
};

/// A record type that can live in an [`EntityCollection`].
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Draft;
    type Patch;

    /// Key prefix in the store, e.g. `tasks`.
    const DOMAIN: &'static str;

    fn id(&self) -> &str;

    fn owner_id(&self) -> &str;

    fn from_draft(id: String, owner_id: &str, draft: Self::Draft) -> Self;

    fn apply(&mut self, patch: &Self::Patch);

    /// Records written for an owner that has never been loaded before.
    fn seed() -> Option<Vec<Self::Draft>> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    Loaded {
        owner_id: Option<String>,
        len: usize,
    },
    Added(String),
    Updated(String),
    Deleted(String),
}

pub struct EntityCollection<R: Record> {
    store: Arc<dyn KeyedStore>,
    owner_id: Option<String>,
    records: Vec<R>,
    /// False after the owner's list could not be read. Writing then would
    /// replace data we never saw, so mutations are refused until a reload.
    synced: bool,
    listeners: Listeners<CollectionEvent>,
}

impl<R: Record> EntityCollection<R> {
    pub fn new(store: Arc<dyn KeyedStore>, owner_id: Option<&str>) -> Self {
        let mut collection = Self {
            store,
            owner_id: None,
            records: Vec::new(),
            synced: true,
            listeners: Listeners::new(),
        };
        collection.load_for_identity(owner_id);
        collection
    }

    /// Swaps in the persisted list of `owner_id`, or empties the collection
    /// when nobody is signed in.
    ///
    /// If the list cannot be read the collection goes read-only: it keeps
    /// showing the same owner's records (or nothing, for a different owner)
    /// and refuses mutations until a later load succeeds.
    pub fn load_for_identity(&mut self, owner_id: Option<&str>) {
        let records = match owner_id {
            Some(owner) => self.read_or_seed(owner),
            None => Ok(Vec::new()),
        };

        let records = match records {
            Ok(records) => records,
            Err(err) => {
                error!("Failed to load {} for {owner_id:?}: {err:#}", R::DOMAIN);
                if self.owner_id.as_deref() != owner_id {
                    self.records.clear();
                    self.owner_id = owner_id.map(str::to_string);
                }
                self.synced = false;
                return;
            }
        };

        self.records = records;
        self.owner_id = owner_id.map(str::to_string);
        self.synced = true;

        debug!(
            "Loaded {} {} for {:?}",
            self.records.len(),
            R::DOMAIN,
            self.owner_id
        );
        self.listeners.emit(&CollectionEvent::Loaded {
            owner_id: self.owner_id.clone(),
            len: self.records.len(),
        });
    }

    /// Appends a new record owned by the current identity. Does nothing and
    /// returns `None` while signed out.
    pub fn add(&mut self, draft: R::Draft) -> Option<&R> {
        if !self.writable() {
            return None;
        }
        let owner = self.owner_id.as_deref()?;
        let record = R::from_draft(Uuid::new_v4().to_string(), owner, draft);
        let id = record.id().to_string();

        self.records.push(record);
        self.persist();
        self.listeners.emit(&CollectionEvent::Added(id));

        self.records.last()
    }

    pub fn update(&mut self, id: &str, patch: &R::Patch) -> bool {
        self.modify(id, |record| record.apply(patch))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        if !self.writable() {
            return false;
        }
        let before = self.records.len();
        self.records.retain(|record| record.id() != id);
        if self.records.len() == before {
            return false;
        }

        self.persist();
        self.listeners
            .emit(&CollectionEvent::Deleted(id.to_string()));
        true
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    /// Whether the last load read the owner's list successfully.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn on_change<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CollectionEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Runs `change` on the record with `id`, then persists. `false` when no
    /// such record exists; nothing is written in that case.
    pub(crate) fn modify<F>(&mut self, id: &str, change: F) -> bool
    where
        F: FnOnce(&mut R),
    {
        if !self.writable() {
            return false;
        }
        let Some(record) = self.records.iter_mut().find(|record| record.id() == id) else {
            return false;
        };
        change(record);

        self.persist();
        self.listeners
            .emit(&CollectionEvent::Updated(id.to_string()));
        true
    }

    fn writable(&self) -> bool {
        if !self.synced {
            warn!(
                "{} for {:?} are read-only until reloaded",
                R::DOMAIN,
                self.owner_id
            );
        }
        self.synced
    }

    fn read_or_seed(&self, owner: &str) -> anyhow::Result<Vec<R>> {
        let key = keys::owned(R::DOMAIN, owner);

        if let Some(stored) = self.store.load::<Vec<R>>(&key)? {
            let total = stored.len();
            let owned: Vec<R> = stored
                .into_iter()
                .filter(|record| record.owner_id() == owner)
                .collect();
            if owned.len() != total {
                warn!(
                    "Dropped {} foreign record(s) from '{key}'",
                    total - owned.len()
                );
            }
            return Ok(owned);
        }

        let Some(drafts) = R::seed() else {
            return Ok(Vec::new());
        };

        let seeded: Vec<R> = drafts
            .into_iter()
            .map(|draft| R::from_draft(Uuid::new_v4().to_string(), owner, draft))
            .collect();
        if let Err(err) = self.store.save(&key, &seeded) {
            error!("Failed to write seeded {}: {err:#}", R::DOMAIN);
        }
        Ok(seeded)
    }

    fn persist(&self) {
        let Some(owner) = self.owner_id.as_deref() else {
            return;
        };
        let key = keys::owned(R::DOMAIN, owner);
        if let Err(err) = self.store.save(&key, &self.records) {
            error!("Failed to persist {}: {err:#}", R::DOMAIN);
        }
    }
}
