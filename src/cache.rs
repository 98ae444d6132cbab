//! Suggestion cache
//!
//! Keyed by normalized query. The coordinator only relies on `get`/`put`
//! with last-write-wins per key; eviction belongs to the implementation.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use crate::suggestion::Suggestion;

pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum CacheError {
    /// Backing store cannot be reached; callers treat this as a miss
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

pub trait SuggestionCache {
    fn get(&self, key: &str) -> Result<Option<Vec<Suggestion>>, CacheError>;

    fn put(&mut self, key: &str, suggestions: Vec<Suggestion>) -> Result<(), CacheError>;
}

/// Bounded in-memory cache, evicting the oldest inserted key when full
#[derive(Debug)]
pub struct MemoryCache {
    entries: HashMap<String, Vec<Suggestion>>,
    /// Insertion order of keys, oldest first
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl SuggestionCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<Suggestion>>, CacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, suggestions: Vec<Suggestion>) -> Result<(), CacheError> {
        if self.entries.insert(key.to_string(), suggestions).is_some() {
            // Overwrite keeps the original insertion slot
            return Ok(());
        }

        self.order.push_back(key.to_string());
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                log::debug!("Evicting cached suggestions for '{}'", oldest);
                self.entries.remove(&oldest);
            }
        }
        Ok(())
    }
}
