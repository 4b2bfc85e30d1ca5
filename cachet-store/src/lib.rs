//! cachet Store - Document-Store Cache Engine
//!
//! Persists key/value entries in a document store with per-entry TTL
//! expiry and group invalidation via tags. The engine translates logical
//! cache operations into physical-key-qualified document operations
//! against a [`DocumentConnection`]; expiry and key uniqueness are
//! enforced by the backing store's own indexes, created once at
//! deployment time through [`DocumentConnection::ensure_indexes`].
//!
//! # Architecture
//!
//! - [`CacheStore`] - the engine: get/put/forget/flush/increment/
//!   decrement/expiration lookup, tag-filtered flush.
//! - [`TaggedCache`] - a view over the store whose writes carry a fixed
//!   tag set and whose flush is scoped to those tags.
//! - [`KeyPrefix`] - deterministic mapping from (prefix, logical key) to
//!   the physical storage key.
//! - [`DocumentConnection`] - the backing driver as an async capability;
//!   [`InMemoryConnection`] is the reference implementation and test
//!   double.
//! - [`Codec`] - opaque value serialization; [`JsonCodec`] by default.
//!
//! # Example
//!
//! ```ignore
//! use cachet_store::{CacheStore, InMemoryConnection, StoreConfig};
//!
//! let connection = Arc::new(InMemoryConnection::new());
//! let store = CacheStore::new(
//!     connection,
//!     StoreConfig::new("cache").with_prefix("app:"),
//! );
//!
//! store.ensure_indexes().await?;
//! store.put("session:42", &"abc", 60, &[]).await?;
//! let session: Option<String> = store.get("session:42").await?;
//!
//! // Tag-scoped writes and invalidation.
//! let sessions = store.tags(["sessions"]);
//! sessions.put("session:43", &"def", Some(60)).await?;
//! sessions.flush().await?;
//! ```

pub mod codec;
pub mod connection;
pub mod events;
pub mod key;
pub mod memory;
pub mod store;
pub mod tagged;

pub use codec::{Codec, JsonCodec};
pub use connection::{
    DocumentConnection, EXPIRATION_TTL_INDEX, KEY_UNIQUE_INDEX, TAGS_INDEX,
};
pub use events::{BufferingSink, EventSink, KeyWritten, NullSink};
pub use key::KeyPrefix;
pub use memory::InMemoryConnection;
pub use store::{CacheStore, StoreConfig};
pub use tagged::TaggedCache;

// Re-export core types for convenience
pub use cachet_core::{
    CacheRecord, CacheResult, Clock, FixedClock, StoreError, SystemClock, Timestamp,
    WriteOutcome, FOREVER_TTL_SECONDS,
};
