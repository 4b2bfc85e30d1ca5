//! The cache store engine.
//!
//! Translates logical get/put/forget/flush operations into physical-key
//! qualified document operations against a [`DocumentConnection`]. Every
//! operation is a single stateless unit of work; concurrency control is
//! the backing store's per-document atomicity, and the engine adds no
//! locking, retries, or timeouts of its own.

use std::sync::Arc;

use cachet_core::{
    expiration_from_ttl, remaining_minutes, CacheRecord, CacheResult, Clock, SystemClock,
    Timestamp, WriteOutcome, FOREVER_TTL_SECONDS,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::codec::{Codec, JsonCodec};
use crate::connection::DocumentConnection;
use crate::key::KeyPrefix;
use crate::tagged::TaggedCache;

/// Configuration consumed at construction: the collection to address and
/// the key prefix (empty by default).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backing collection/table name.
    pub collection: String,
    /// Prefix applied to every logical key.
    pub prefix: String,
}

impl StoreConfig {
    /// Configuration for a collection with no key prefix.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            prefix: String::new(),
        }
    }

    /// Set the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Durable cache store over a document-store connection.
///
/// Reads never check expiration client-side: lazy expiry belongs to the
/// backing store's TTL rule, so [`DocumentConnection::ensure_indexes`]
/// must have run against the collection before production use.
///
/// # Example
///
/// ```ignore
/// let connection = Arc::new(InMemoryConnection::new());
/// let store = CacheStore::new(connection, StoreConfig::new("cache").with_prefix("app:"));
///
/// store.put("session:42", &"abc", 60, &[]).await?;
/// let hit: Option<String> = store.get("session:42").await?;
/// ```
pub struct CacheStore<P, C = JsonCodec>
where
    P: DocumentConnection,
    C: Codec,
{
    pub(crate) connection: Arc<P>,
    pub(crate) codec: C,
    pub(crate) collection: String,
    pub(crate) prefix: KeyPrefix,
    pub(crate) clock: Arc<dyn Clock>,
}

impl<P, C> Clone for CacheStore<P, C>
where
    P: DocumentConnection,
    C: Codec + Clone,
{
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            codec: self.codec.clone(),
            collection: self.collection.clone(),
            prefix: self.prefix.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<P> CacheStore<P, JsonCodec>
where
    P: DocumentConnection,
{
    /// Build a JSON-codec store on the system clock. This is the explicit
    /// factory: no process-wide registry is involved.
    pub fn new(connection: Arc<P>, config: StoreConfig) -> Self {
        Self::with_codec(connection, config, JsonCodec)
    }
}

impl<P, C> CacheStore<P, C>
where
    P: DocumentConnection,
    C: Codec,
{
    /// Build a store with a caller-supplied codec.
    pub fn with_codec(connection: Arc<P>, config: StoreConfig, codec: C) -> Self {
        Self {
            connection,
            codec,
            collection: config.collection,
            prefix: KeyPrefix::new(config.prefix),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source. Tests use this to freeze the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The configured collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The configured key prefix.
    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    // ========================================================================
    // READ PATH
    // ========================================================================

    /// Retrieve an item by logical key.
    ///
    /// A miss is `Ok(None)`, never an error. Corrupt stored bytes surface
    /// as [`StoreError::Codec`](cachet_core::StoreError::Codec).
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let physical = self.prefix.physical(key);
        match self.connection.find_one(&self.collection, &physical).await? {
            Some(record) => Ok(Some(self.codec.decode(&record.value)?)),
            None => Ok(None),
        }
    }

    /// Retrieve several items, one `Option` per requested key, in order.
    pub async fn get_many<T: DeserializeOwned>(
        &self,
        keys: &[&str],
    ) -> CacheResult<Vec<Option<T>>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await?);
        }
        Ok(values)
    }

    /// Remaining lifetime of a key in signed, rounded minutes. `Ok(None)`
    /// if no record exists; negative once expired but not yet swept.
    pub async fn get_expiration(&self, key: &str) -> CacheResult<Option<i64>> {
        let physical = self.prefix.physical(key);
        match self.connection.find_one(&self.collection, &physical).await? {
            Some(record) => Ok(Some(remaining_minutes(record.expiration, self.clock.now()))),
            None => Ok(None),
        }
    }

    // ========================================================================
    // WRITE PATH
    // ========================================================================

    /// Store an item for `ttl_seconds`, attaching `tags` to the record.
    ///
    /// A non-positive TTL deletes instead of writing. Returns `Ok(false)`
    /// when the upsert lost a duplicate-key race; the caller may retry.
    pub async fn put<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: i64,
        tags: &[String],
    ) -> CacheResult<bool> {
        if ttl_seconds <= 0 {
            return self.forget(key).await;
        }

        let expiration = expiration_from_ttl(self.clock.now(), ttl_seconds);
        self.put_with_expiration(key, value, expiration, tags.to_vec())
            .await
    }

    /// Store an item with an exact expiration instant. Increment and
    /// decrement use this to carry a record's original deadline forward
    /// unchanged.
    pub(crate) async fn put_with_expiration<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expiration: Timestamp,
        tags: Vec<String>,
    ) -> CacheResult<bool> {
        let physical = self.prefix.physical(key);
        let record = CacheRecord {
            key: physical.clone(),
            value: self.codec.encode(value)?,
            expiration,
            tags,
        };

        match self.connection.upsert(&self.collection, record).await? {
            WriteOutcome::Applied => Ok(true),
            WriteOutcome::Conflict => {
                debug!(key = %physical, collection = %self.collection, "upsert lost duplicate-key race");
                Ok(false)
            }
        }
    }

    /// Store an item with no practical expiry ([`FOREVER_TTL_SECONDS`]).
    pub async fn forever<T: Serialize>(&self, key: &str, value: &T) -> CacheResult<bool> {
        self.put(key, value, FOREVER_TTL_SECONDS, &[]).await
    }

    // ========================================================================
    // COUNTERS
    // ========================================================================

    /// Add `delta` to a stored integer value.
    ///
    /// `Ok(None)` when the key is absent, the stored value is not an
    /// integer, or the rewrite lost a race; `Ok(Some(new))` otherwise. The
    /// record's expiration and tags are preserved exactly. The read and
    /// the rewrite are separate operations, so two concurrent calls on the
    /// same key can lose an update.
    pub async fn increment(&self, key: &str, delta: i64) -> CacheResult<Option<i64>> {
        self.adjust(key, delta).await
    }

    /// Subtract `delta` from a stored integer value. Same contract as
    /// [`increment`](CacheStore::increment).
    pub async fn decrement(&self, key: &str, delta: i64) -> CacheResult<Option<i64>> {
        self.adjust(key, -delta).await
    }

    async fn adjust(&self, key: &str, delta: i64) -> CacheResult<Option<i64>> {
        let physical = self.prefix.physical(key);
        let Some(record) = self.connection.find_one(&self.collection, &physical).await? else {
            return Ok(None);
        };

        // The counter contract reports a non-integer value as a failed
        // adjustment, not as cache corruption.
        let current: i64 = match self.codec.decode(&record.value) {
            Ok(value) => value,
            Err(_) => return Ok(None),
        };

        let new_value = current + delta;
        let written = self
            .put_with_expiration(key, &new_value, record.expiration, record.tags)
            .await?;

        Ok(written.then_some(new_value))
    }

    // ========================================================================
    // DELETION
    // ========================================================================

    /// Delete the record for a key. Idempotent; reports success whether or
    /// not a record existed.
    pub async fn forget(&self, key: &str) -> CacheResult<bool> {
        let physical = self.prefix.physical(key);
        self.connection.delete_one(&self.collection, &physical).await?;
        Ok(true)
    }

    /// Delete every record in the collection.
    pub async fn flush(&self) -> CacheResult<bool> {
        let removed = self.connection.delete_all(&self.collection).await?;
        debug!(collection = %self.collection, removed, "flushed collection");
        Ok(true)
    }

    /// Delete every record carrying any of the given tags, independently
    /// per tag. A record already removed by an earlier tag is a harmless
    /// no-op for later ones.
    pub async fn flush_by_tags(&self, tags: &[String]) -> CacheResult<()> {
        for tag in tags {
            let removed = self.connection.delete_by_tag(&self.collection, tag).await?;
            debug!(tag = %tag, collection = %self.collection, removed, "flushed records by tag");
        }
        Ok(())
    }

    // ========================================================================
    // ADMINISTRATION
    // ========================================================================

    /// Create the supporting indexes on this store's collection. One-shot,
    /// idempotent, invoked by deployment tooling rather than runtime
    /// callers.
    pub async fn ensure_indexes(&self) -> CacheResult<()> {
        self.connection.ensure_indexes(&self.collection).await
    }

    /// Drop the supporting indexes on this store's collection.
    pub async fn drop_indexes(&self) -> CacheResult<()> {
        self.connection.drop_indexes(&self.collection).await
    }
}

impl<P, C> CacheStore<P, C>
where
    P: DocumentConnection,
    C: Codec + Clone,
{
    /// Construct a view of this store whose writes carry the given tags
    /// and whose flush is scoped to them.
    pub fn tags<I, S>(&self, tags: I) -> TaggedCache<P, C>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TaggedCache::new(
            self.clone(),
            tags.into_iter().map(Into::into).collect(),
        )
    }
}
