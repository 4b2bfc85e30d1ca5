//! Fuzz test for record deserialization and key formatting
//!
//! This fuzz target checks that documents read back from an untrusted
//! collection and arbitrary caller-supplied keys can't panic the store:
//! - CacheRecord deserialization returns Ok or Err, never panics
//! - Physical key formatting holds its shape for any prefix/key pair
//!
//! Run with: cargo +nightly fuzz run record_fuzz -- -max_total_time=60

#![no_main]

use cachet_core::CacheRecord;
use cachet_store::KeyPrefix;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a stored document.
    let _ = serde_json::from_slice::<CacheRecord>(data);

    // Arbitrary UTF-8 as prefix and logical key.
    if let Ok(input) = std::str::from_utf8(data) {
        let mut split = input.len() / 2;
        while !input.is_char_boundary(split) {
            split -= 1;
        }
        let (prefix, logical) = input.split_at(split);

        let formatter = KeyPrefix::new(prefix);
        let physical = formatter.physical(logical);

        assert!(physical.starts_with(prefix), "Physical key keeps the prefix");
        assert!(physical.ends_with(logical), "Physical key keeps the logical key");
        assert_eq!(
            physical.len(),
            prefix.len() + logical.len(),
            "Concatenation adds nothing"
        );
    }
});
