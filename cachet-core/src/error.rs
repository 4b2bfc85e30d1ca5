//! Error types for cache operations
//!
//! Only genuinely fatal conditions are errors. A read miss is `Ok(None)`
//! and a duplicate-key write race is reported through
//! [`WriteOutcome::Conflict`](crate::WriteOutcome), never through this enum.

use thiserror::Error;

/// Fatal failures surfaced to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing document store or its driver is unreachable. The engine
    /// has no fallback store; the caller must handle this.
    #[error("Backing store unavailable: {reason}")]
    Unavailable { reason: String },

    /// Stored bytes could not be decoded (or a value could not be encoded).
    /// A corrupted cache entry is a data-integrity signal worth surfacing,
    /// so no partial recovery is attempted.
    #[error("Codec failure: {reason}")]
    Codec { reason: String },

    /// An administrative index operation failed.
    #[error("Index error on {index_name}: {reason}")]
    Index { index_name: String, reason: String },

    /// An in-process lock in a connection implementation was poisoned.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, StoreError>;
