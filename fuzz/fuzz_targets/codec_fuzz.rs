//! Fuzz test for the JSON value codec
//!
//! This fuzz target feeds arbitrary byte sequences through decode to find:
//! - Panics or crashes
//! - Infinite loops
//! - Memory safety issues
//!
//! Run with: cargo +nightly fuzz run codec_fuzz -- -max_total_time=60

#![no_main]

use cachet_store::{Codec, JsonCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = JsonCodec;

    // Decoding arbitrary bytes must never panic - it returns Ok or a
    // Codec error.
    let decoded: Result<serde_json::Value, _> = codec.decode(data);

    if let Ok(value) = decoded {
        // Anything that decoded must encode again, and the re-encoded
        // bytes must decode to the same value.
        let bytes = codec.encode(&value).expect("re-encode of decoded value");
        let again: serde_json::Value = codec.decode(&bytes).expect("decode of re-encoded bytes");
        assert_eq!(value, again, "Codec roundtrip should preserve the value");
    }
});
