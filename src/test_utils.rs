//! Shared test utilities for fasta-suggest
//!
//! Fakes for the cache, source and sink collaborators used across the
//! coordinator and worker tests.

#[cfg(test)]
pub mod test_helpers {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use futures::FutureExt;
    use futures::future::BoxFuture;
    use tokio::sync::Notify;

    use crate::cache::{CacheError, MemoryCache, SuggestionCache};
    use crate::query::coordinator::Settlement;
    use crate::query::normalize::NormalizedQuery;
    use crate::sink::ResultSink;
    use crate::source::{SourceError, SuggestionSource};
    use crate::suggestion::{SelectedItem, Suggestion};

    pub fn species(id: &str, name: &str, scientific: &str) -> Suggestion {
        Suggestion::new(id, name, scientific, "species")
    }

    pub fn lion() -> Suggestion {
        species("L1.1", "Lion", "Panthera leo")
    }

    pub fn tiger() -> Suggestion {
        species("T1.2", "Tiger", "Panthera tigris")
    }

    pub fn wolf() -> Suggestion {
        species("W1.3", "Gray wolf", "Canis lupus")
    }

    /// Memory cache wrapper counting calls
    #[derive(Debug, Default)]
    pub struct CountingCache {
        pub inner: MemoryCache,
        pub gets: Arc<AtomicUsize>,
        pub puts: Arc<AtomicUsize>,
    }

    impl CountingCache {
        pub fn with_entry(key: &str, suggestions: Vec<Suggestion>) -> Self {
            let mut cache = Self::default();
            cache.inner.put(key, suggestions).unwrap();
            cache
        }

        pub fn get_count(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.gets)
        }

        pub fn put_count(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.puts)
        }
    }

    impl SuggestionCache for CountingCache {
        fn get(&self, key: &str) -> Result<Option<Vec<Suggestion>>, CacheError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key)
        }

        fn put(&mut self, key: &str, suggestions: Vec<Suggestion>) -> Result<(), CacheError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.inner.put(key, suggestions)
        }
    }

    /// Cache whose backing store is always down
    #[derive(Debug, Default)]
    pub struct UnavailableCache;

    impl SuggestionCache for UnavailableCache {
        fn get(&self, _key: &str) -> Result<Option<Vec<Suggestion>>, CacheError> {
            Err(CacheError::Unavailable("store offline".to_string()))
        }

        fn put(&mut self, _key: &str, _suggestions: Vec<Suggestion>) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("store offline".to_string()))
        }
    }

    /// Source answering from a fixed table
    ///
    /// Queries with a gate wait until the gate is notified, which lets a
    /// test decide the order in which concurrent lookups resolve.
    #[derive(Default)]
    pub struct StubSource {
        responses: HashMap<String, Result<Vec<Suggestion>, SourceError>>,
        gates: HashMap<String, Arc<Notify>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, query: &str, suggestions: Vec<Suggestion>) -> Self {
            self.responses.insert(query.to_string(), Ok(suggestions));
            self
        }

        pub fn fail(mut self, query: &str, error: SourceError) -> Self {
            self.responses.insert(query.to_string(), Err(error));
            self
        }

        /// Hold lookups for `query` until the returned handle is notified
        pub fn gate(&mut self, query: &str) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            self.gates.insert(query.to_string(), Arc::clone(&notify));
            notify
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SuggestionSource for StubSource {
        fn fetch<'a>(
            &'a self,
            query: &'a str,
        ) -> BoxFuture<'a, Result<Vec<Suggestion>, SourceError>> {
            async move {
                self.calls.lock().unwrap().push(query.to_string());
                if let Some(gate) = self.gates.get(query) {
                    gate.notified().await;
                }
                self.responses
                    .get(query)
                    .cloned()
                    .unwrap_or_else(|| Ok(Vec::new()))
            }
            .boxed()
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    /// Everything a sink was told, shared with the test body
    #[derive(Debug, Default)]
    pub struct SinkLog {
        pub settlements: Vec<Settlement>,
        pub failures: Vec<(NormalizedQuery, SourceError)>,
        pub selections: Vec<SelectedItem>,
    }

    #[derive(Debug, Default, Clone)]
    pub struct RecordingSink {
        pub log: Arc<Mutex<SinkLog>>,
    }

    impl ResultSink for RecordingSink {
        fn settled(&mut self, settlement: &Settlement) {
            self.log
                .lock()
                .unwrap()
                .settlements
                .push(settlement.clone());
        }

        fn lookup_failed(&mut self, query: &NormalizedQuery, error: &SourceError) {
            self.log
                .lock()
                .unwrap()
                .failures
                .push((query.clone(), error.clone()));
        }

        fn selected(&mut self, item: &SelectedItem) {
            self.log.lock().unwrap().selections.push(item.clone());
        }
    }
}
