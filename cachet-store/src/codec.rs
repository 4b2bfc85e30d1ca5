//! Value serialization seam.
//!
//! The engine never interprets stored bytes; encoding and decoding of
//! application values go through [`Codec`]. The provided [`JsonCodec`]
//! covers anything serde can represent; a caller with its own wire format
//! implements the trait instead.

use cachet_core::{CacheResult, StoreError};
use serde::{de::DeserializeOwned, Serialize};

/// Opaque byte codec for application values.
///
/// Decode failure means the stored entry is corrupt relative to the codec
/// in use; implementations map it to [`StoreError::Codec`], which the
/// engine propagates as fatal.
pub trait Codec: Send + Sync {
    /// Encode a value to bytes for storage.
    fn encode<T: Serialize>(&self, value: &T) -> CacheResult<Vec<u8>>;

    /// Decode stored bytes back to a value.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CacheResult<T>;
}

/// JSON codec over serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> CacheResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| StoreError::Codec {
            reason: e.to_string(),
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CacheResult<T> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Codec {
            reason: e.to_string(),
        })
    }
}
