//! In-memory reference connection.
//!
//! Models the behavior contract a real document store provides: upserts
//! keyed by physical key, exact-membership tag deletion, and TTL expiry
//! that only takes effect once the expiry index exists. Used as the test
//! double throughout the workspace and as the template for writing a real
//! driver adapter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use cachet_core::{CacheRecord, CacheResult, Clock, StoreError, SystemClock, WriteOutcome};

use crate::connection::DocumentConnection;

/// One named collection: its records plus whether the supporting indexes
/// have been created.
#[derive(Debug, Default)]
struct Collection {
    records: HashMap<String, CacheRecord>,
    indexed: bool,
}

/// In-memory document-store connection.
///
/// Without `ensure_indexes`, expired records stay visible, mirroring a
/// real document store where removal is the TTL index's job and not the
/// application's. With it, `find_one` hides dead records and removes them
/// lazily.
pub struct InMemoryConnection {
    collections: RwLock<HashMap<String, Collection>>,
    clock: Arc<dyn Clock>,
    conflict_next_upsert: AtomicBool,
}

impl InMemoryConnection {
    /// Create a connection on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a connection with an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            clock,
            conflict_next_upsert: AtomicBool::new(false),
        }
    }

    /// Make the next upsert report a duplicate-key conflict instead of
    /// writing. Models the high-concurrency insert race for tests.
    pub fn fail_next_upsert_with_conflict(&self) {
        self.conflict_next_upsert.store(true, Ordering::SeqCst);
    }

    /// Number of records physically present in a collection, expired ones
    /// included.
    pub fn record_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|map| map.get(collection).map_or(0, |c| c.records.len()))
            .unwrap_or(0)
    }

    /// Fetch a record bypassing TTL visibility, for test assertions on the
    /// raw stored document.
    pub fn raw_get(&self, collection: &str, key: &str) -> Option<CacheRecord> {
        self.collections
            .read()
            .ok()
            .and_then(|map| map.get(collection).and_then(|c| c.records.get(key).cloned()))
    }

    /// Drop all collections and records.
    pub fn clear(&self) {
        if let Ok(mut map) = self.collections.write() {
            map.clear();
        }
    }
}

impl Default for InMemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentConnection for InMemoryConnection {
    async fn find_one(&self, collection: &str, key: &str) -> CacheResult<Option<CacheRecord>> {
        let now = self.clock.now();
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        let Some(coll) = map.get_mut(collection) else {
            return Ok(None);
        };

        match coll.records.get(key) {
            Some(record) if coll.indexed && record.expiration <= now => {
                // The TTL rule would have removed it; do so lazily.
                coll.records.remove(key);
                Ok(None)
            }
            Some(record) => Ok(Some(record.clone())),
            None => Ok(None),
        }
    }

    async fn upsert(&self, collection: &str, record: CacheRecord) -> CacheResult<WriteOutcome> {
        if self.conflict_next_upsert.swap(false, Ordering::SeqCst) {
            return Ok(WriteOutcome::Conflict);
        }

        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        map.entry(collection.to_string())
            .or_default()
            .records
            .insert(record.key.clone(), record);

        Ok(WriteOutcome::Applied)
    }

    async fn delete_one(&self, collection: &str, key: &str) -> CacheResult<bool> {
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        Ok(map
            .get_mut(collection)
            .and_then(|c| c.records.remove(key))
            .is_some())
    }

    async fn delete_all(&self, collection: &str) -> CacheResult<u64> {
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        let Some(coll) = map.get_mut(collection) else {
            return Ok(0);
        };
        let removed = coll.records.len() as u64;
        coll.records.clear();
        Ok(removed)
    }

    async fn delete_by_tag(&self, collection: &str, tag: &str) -> CacheResult<u64> {
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        let Some(coll) = map.get_mut(collection) else {
            return Ok(0);
        };

        let before = coll.records.len();
        coll.records
            .retain(|_, record| !record.tags.iter().any(|t| t == tag));
        Ok((before - coll.records.len()) as u64)
    }

    async fn ensure_indexes(&self, collection: &str) -> CacheResult<()> {
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        map.entry(collection.to_string()).or_default().indexed = true;
        Ok(())
    }

    async fn drop_indexes(&self, collection: &str) -> CacheResult<()> {
        let mut map = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        if let Some(coll) = map.get_mut(collection) {
            coll.indexed = false;
        }
        Ok(())
    }
}
