//! cachet Core - Record Types and Expiry Arithmetic
//!
//! Pure data structures with no behavior. The store engine and any real
//! connection implementation depend on this crate; it depends on nothing
//! inside the workspace.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub mod clock;
pub mod error;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CacheResult, StoreError};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Timestamp type using UTC timezone, millisecond precision in storage.
pub type Timestamp = DateTime<Utc>;

/// TTL used when a caller asks for "no practical expiry": ten years in
/// seconds. Entries written with it still carry a concrete expiration
/// instant, so the backing store's expiry rule applies uniformly.
pub const FOREVER_TTL_SECONDS: i64 = 315_360_000;

// ============================================================================
// CACHE RECORD
// ============================================================================

/// The unit of storage: one document per logical key.
///
/// `key` is the physical (prefix-qualified) key and is unique across the
/// collection once the supporting uniqueness index exists. `value` holds
/// codec-encoded bytes; the store never interprets them. `expiration` is an
/// absolute instant: a record at or past it is logically dead even before
/// the backing store's expiry rule physically removes it. `tags` is a
/// denormalized copy attached at write time, empty for untagged writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Physical key, prefix + logical key.
    pub key: String,
    /// Codec-encoded application value.
    pub value: Vec<u8>,
    /// Absolute expiry instant.
    pub expiration: Timestamp,
    /// Tag labels for group invalidation.
    pub tags: Vec<String>,
}

// ============================================================================
// WRITE OUTCOME
// ============================================================================

/// Result of an upsert against the backing store.
///
/// `Conflict` is the duplicate-key race between two concurrent inserts for
/// the same new key. It is a normal outcome the caller may ignore or retry,
/// distinct from an `Err`, which is fatal (driver failure, corruption).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The record was created or replaced in place.
    Applied,
    /// The upsert lost a duplicate-key race and wrote nothing.
    Conflict,
}

impl WriteOutcome {
    /// Whether the write took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied)
    }
}

// ============================================================================
// EXPIRY ARITHMETIC
// ============================================================================

/// Compute the absolute expiration for a write happening at `now`.
///
/// The instant is derived from whole seconds, `(now_s + ttl_seconds) * 1000`
/// milliseconds, so two writes in the same second get identical expirations.
pub fn expiration_from_ttl(now: Timestamp, ttl_seconds: i64) -> Timestamp {
    let expiration_ms = (now.timestamp() + ttl_seconds) * 1000;
    Utc.timestamp_millis_opt(expiration_ms)
        .single()
        .unwrap_or(now)
}

/// Signed minutes remaining until `expiration`, rounded to the nearest
/// minute. Negative when the record is already expired but not yet swept.
pub fn remaining_minutes(expiration: Timestamp, now: Timestamp) -> i64 {
    let remaining_seconds = expiration.timestamp() - now.timestamp();
    (remaining_seconds as f64 / 60.0).round() as i64
}
