//! Write notifications for external observers.
//!
//! A successful tagged put is announced to an [`EventSink`] so metrics or
//! invalidation listeners can react without being wired into the engine.
//! The default sink discards events.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// A key was written through a tagged view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyWritten {
    /// Logical key as the caller supplied it.
    pub key: String,
    /// Codec-encoded value bytes that were stored.
    pub value: Vec<u8>,
    /// TTL the write was made with, in seconds.
    pub ttl_seconds: i64,
}

/// Observer seam for write notifications.
pub trait EventSink: Send + Sync {
    /// Called once per successfully written key.
    fn key_written(&self, event: KeyWritten);
}

/// Sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn key_written(&self, _event: KeyWritten) {}
}

/// Sink that buffers events in memory, for tests and simple consumers.
#[derive(Debug, Default)]
pub struct BufferingSink {
    events: Mutex<Vec<KeyWritten>>,
}

impl BufferingSink {
    /// Create an empty buffering sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events observed so far.
    pub fn events(&self) -> Vec<KeyWritten> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for BufferingSink {
    fn key_written(&self, event: KeyWritten) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffering_sink_records_in_order() {
        let sink = BufferingSink::new();

        sink.key_written(KeyWritten {
            key: "a".to_string(),
            value: b"1".to_vec(),
            ttl_seconds: 60,
        });
        sink.key_written(KeyWritten {
            key: "b".to_string(),
            value: b"2".to_vec(),
            ttl_seconds: 30,
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].key, "a");
        assert_eq!(events[1].key, "b");
        assert_eq!(events[1].ttl_seconds, 30);
    }
}
