//! Tag-bound view over a cache store.
//!
//! Composition, not inheritance: the view holds a store plus a fixed tag
//! set captured at construction. Writes through the view carry the bound
//! tags and flush is scoped to them; reads and single-key deletes pass
//! through unchanged, since tags scope writes and flush only.

use std::sync::Arc;

use cachet_core::{CacheResult, FOREVER_TTL_SECONDS};
use serde::{de::DeserializeOwned, Serialize};

use crate::codec::Codec;
use crate::connection::DocumentConnection;
use crate::events::{EventSink, KeyWritten, NullSink};
use crate::store::CacheStore;

/// A cache view whose writes carry a fixed tag set.
///
/// Flushing the view removes every record carrying ANY of the bound tags,
/// not only records carrying all of them.
pub struct TaggedCache<P, C>
where
    P: DocumentConnection,
    C: Codec,
{
    store: CacheStore<P, C>,
    bound_tags: Vec<String>,
    events: Arc<dyn EventSink>,
}

impl<P, C> TaggedCache<P, C>
where
    P: DocumentConnection,
    C: Codec,
{
    pub(crate) fn new(store: CacheStore<P, C>, bound_tags: Vec<String>) -> Self {
        Self {
            store,
            bound_tags,
            events: Arc::new(NullSink),
        }
    }

    /// Attach an observer notified once per successfully written key.
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// The tags every write through this view carries.
    pub fn bound_tags(&self) -> &[String] {
        &self.bound_tags
    }

    // ========================================================================
    // WRITES (tag-scoped)
    // ========================================================================

    /// Store an item carrying the bound tags. A `None` TTL means no
    /// practical expiry; a non-positive TTL deletes instead of writing.
    pub async fn put<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<i64>,
    ) -> CacheResult<bool> {
        let seconds = ttl_seconds.unwrap_or(FOREVER_TTL_SECONDS);
        if seconds <= 0 {
            return self.store.forget(key).await;
        }

        let written = self
            .store
            .put(key, value, seconds, &self.bound_tags)
            .await?;

        if written {
            self.events.key_written(KeyWritten {
                key: key.to_string(),
                value: self.store.codec.encode(value)?,
                ttl_seconds: seconds,
            });
        }

        Ok(written)
    }

    /// Store several key/value pairs with the same TTL. No atomicity
    /// across the batch: each pair is written and reported independently,
    /// one event per written key.
    pub async fn put_many<T: Serialize>(
        &self,
        pairs: &[(String, T)],
        ttl_seconds: Option<i64>,
    ) -> CacheResult<Vec<bool>> {
        let mut results = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            results.push(self.put(key, value, ttl_seconds).await?);
        }
        Ok(results)
    }

    /// Remove every record carrying any of the bound tags.
    pub async fn flush(&self) -> CacheResult<()> {
        self.store.flush_by_tags(&self.bound_tags).await
    }

    // ========================================================================
    // PASS-THROUGHS (tags do not scope reads)
    // ========================================================================

    /// See [`CacheStore::get`].
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        self.store.get(key).await
    }

    /// See [`CacheStore::get_many`].
    pub async fn get_many<T: DeserializeOwned>(
        &self,
        keys: &[&str],
    ) -> CacheResult<Vec<Option<T>>> {
        self.store.get_many(keys).await
    }

    /// See [`CacheStore::get_expiration`].
    pub async fn get_expiration(&self, key: &str) -> CacheResult<Option<i64>> {
        self.store.get_expiration(key).await
    }

    /// See [`CacheStore::forget`].
    pub async fn forget(&self, key: &str) -> CacheResult<bool> {
        self.store.forget(key).await
    }

    /// See [`CacheStore::increment`].
    pub async fn increment(&self, key: &str, delta: i64) -> CacheResult<Option<i64>> {
        self.store.increment(key, delta).await
    }

    /// See [`CacheStore::decrement`].
    pub async fn decrement(&self, key: &str, delta: i64) -> CacheResult<Option<i64>> {
        self.store.decrement(key, delta).await
    }
}
