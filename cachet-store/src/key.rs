//! Prefix-qualified cache key formatting.
//!
//! Every read and write path maps the caller-visible logical key through
//! [`KeyPrefix::physical`], so what is stored is always what is queried.
//! The mapping is plain concatenation with no escaping; the configured
//! prefix must not collide with unrelated physical keys.

/// The configured key prefix, applied to every logical key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    /// Create a prefix. An empty string disables prefixing.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// The empty prefix: physical keys equal logical keys.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The raw prefix string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map a logical key to its physical storage key.
    pub fn physical(&self, logical_key: &str) -> String {
        let mut key = String::with_capacity(self.0.len() + logical_key.len());
        key.push_str(&self.0);
        key.push_str(logical_key);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_prepends_prefix() {
        let prefix = KeyPrefix::new("app:");
        assert_eq!(prefix.physical("session:42"), "app:session:42");
    }

    #[test]
    fn test_empty_prefix_is_identity() {
        let prefix = KeyPrefix::empty();
        assert_eq!(prefix.physical("session:42"), "session:42");
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(KeyPrefix::default(), KeyPrefix::empty());
        assert_eq!(KeyPrefix::default().as_str(), "");
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the physical key always starts with the prefix and
        /// ends with the logical key.
        #[test]
        fn prop_physical_shape(prefix in ".{0,16}", logical in ".{0,64}") {
            let formatter = KeyPrefix::new(prefix.clone());
            let physical = formatter.physical(&logical);

            prop_assert!(physical.starts_with(&prefix));
            prop_assert!(physical.ends_with(&logical));
            prop_assert_eq!(physical.len(), prefix.len() + logical.len());
        }

        /// Property: for a fixed prefix the mapping is injective, so two
        /// distinct logical keys never share a storage record.
        #[test]
        fn prop_injective_for_fixed_prefix(
            prefix in "[a-z:]{0,8}",
            a in "[a-z0-9:]{1,32}",
            b in "[a-z0-9:]{1,32}",
        ) {
            let formatter = KeyPrefix::new(prefix);
            if a != b {
                prop_assert_ne!(formatter.physical(&a), formatter.physical(&b));
            } else {
                prop_assert_eq!(formatter.physical(&a), formatter.physical(&b));
            }
        }
    }
}
