//! Raw input to cache key
//!
//! Inputs that differ only by case or surrounding whitespace map to the
//! same key.

use std::fmt;

use serde::Serialize;

/// Trimmed, lower-cased query used as the cache key and remote request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedQuery(String);

impl NormalizedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters, not bytes
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_too_short(&self, min_len: usize) -> bool {
        self.char_len() < min_len
    }
}

impl fmt::Display for NormalizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn normalize(raw: &str) -> NormalizedQuery {
    NormalizedQuery(raw.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_trims_and_lowercases() {
        assert_eq!(normalize("  Cats ").as_str(), "cats");
        assert_eq!(normalize("\tGRAY Wolf\n").as_str(), "gray wolf");
    }

    #[test]
    fn test_inner_whitespace_kept() {
        assert_eq!(normalize("red  fox").as_str(), "red  fox");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(normalize("   ").is_empty());
    }

    #[test]
    fn test_too_short_counts_chars() {
        assert!(normalize("ab").is_too_short(3));
        assert!(!normalize("cat").is_too_short(3));
        // Three multi-byte characters
        assert!(!normalize("ÉLK").is_too_short(3));
    }

    // Case and surrounding whitespace never change the key
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_case_and_padding_insensitive(
            word in "[a-z]{1,12}",
            left in "[ \t]{0,3}",
            right in "[ \t\n]{0,3}",
            upper in prop::bool::ANY,
        ) {
            let cased = if upper { word.to_uppercase() } else { word.clone() };
            let raw = format!("{}{}{}", left, cased, right);
            prop_assert_eq!(normalize(&raw), normalize(&word));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_normalize_is_idempotent(raw in "[a-zA-Z \\t]{0,20}") {
            let once = normalize(&raw);
            let twice = normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }
    }
}
