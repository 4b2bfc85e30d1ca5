//! Document-store connection capability.
//!
//! The backing driver is an external collaborator; the engine only needs a
//! filtered find-one, a filtered update-or-insert, filtered deletes, and
//! the one-shot index administration used at deployment time. Every method
//! addresses an explicit collection, so one connection serves any number of
//! stores.

use async_trait::async_trait;
use cachet_core::{CacheRecord, CacheResult, WriteOutcome};

/// Name of the uniqueness index on the `key` field.
pub const KEY_UNIQUE_INDEX: &str = "key_1";

/// Name of the TTL-expiry index on the `expiration` field.
pub const EXPIRATION_TTL_INDEX: &str = "expiration_ttl_1";

/// Name of the lookup index on the `tags` field.
pub const TAGS_INDEX: &str = "tags_1";

/// Async capability trait over a document-store connection.
///
/// Implementations must be safe for concurrent use from independent
/// callers; all concurrency control is the backing store's per-document
/// atomicity. Connectivity failures surface as
/// [`StoreError::Unavailable`](cachet_core::StoreError::Unavailable).
#[async_trait]
pub trait DocumentConnection: Send + Sync {
    // ========================================================================
    // RECORD OPERATIONS
    // ========================================================================

    /// Find the record with the given physical key, if any.
    ///
    /// Records removed by the store's TTL-expiry rule are not returned;
    /// a record whose expiry the rule has not yet processed may be.
    async fn find_one(&self, collection: &str, key: &str) -> CacheResult<Option<CacheRecord>>;

    /// Update the record matching `record.key`, or insert it if absent,
    /// replacing `value`, `expiration`, and `tags` wholesale.
    ///
    /// A duplicate-key race between two concurrent inserts reports
    /// [`WriteOutcome::Conflict`]; it is not an `Err`.
    async fn upsert(&self, collection: &str, record: CacheRecord) -> CacheResult<WriteOutcome>;

    /// Delete the record with the given physical key. Idempotent; returns
    /// whether a record was removed.
    async fn delete_one(&self, collection: &str, key: &str) -> CacheResult<bool>;

    /// Delete every record in the collection. Returns the number removed.
    async fn delete_all(&self, collection: &str) -> CacheResult<u64>;

    /// Delete every record whose `tags` field contains `tag` (exact
    /// membership). Returns the number removed.
    async fn delete_by_tag(&self, collection: &str, tag: &str) -> CacheResult<u64>;

    // ========================================================================
    // INDEX ADMINISTRATION (deployment time, not on the hot path)
    // ========================================================================

    /// Idempotently create the three supporting structures: the uniqueness
    /// index on `key` ([`KEY_UNIQUE_INDEX`]), the zero-grace TTL-expiry
    /// rule on `expiration` ([`EXPIRATION_TTL_INDEX`]), and the `tags`
    /// lookup index ([`TAGS_INDEX`]).
    ///
    /// The store's correctness contract (no duplicate keys, automatic
    /// expiry without an application sweep) presumes this has run against
    /// the collection before production use.
    async fn ensure_indexes(&self, collection: &str) -> CacheResult<()>;

    /// Remove the three structures created by [`ensure_indexes`]. Used for
    /// rollback and migration-down.
    ///
    /// [`ensure_indexes`]: DocumentConnection::ensure_indexes
    async fn drop_indexes(&self, collection: &str) -> CacheResult<()>;
}
