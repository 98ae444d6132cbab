// Configuration type definitions

use serde::Deserialize;

use crate::cache::DEFAULT_CAPACITY;
use crate::query::debouncer::DEFAULT_DEBOUNCE_MS;

pub const DEFAULT_MIN_QUERY_LEN: usize = 3;
pub const DEFAULT_ITEM_KIND: &str = "fasta";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/suggestions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Input pipeline section
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestConfig {
    /// Quiet period before a lookup runs
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Normalized queries shorter than this never trigger a lookup
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Kind tag attached to selected items
    #[serde(default = "default_item_kind")]
    pub item_kind: String,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}

fn default_item_kind() -> String {
    DEFAULT_ITEM_KIND.to_string()
}

impl Default for SuggestConfig {
    fn default() -> Self {
        SuggestConfig {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            item_kind: DEFAULT_ITEM_KIND.to_string(),
        }
    }
}

/// Remote suggestion service section
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Access credential sent with every lookup
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Cache section
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub suggest: SuggestConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
