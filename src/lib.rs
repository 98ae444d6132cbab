//! fasta-suggest library - debounced, cache-backed taxon suggestions
//!
//! This library exposes the suggestion pipeline so it can be embedded in
//! other front ends and exercised by tests.

pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod query;
pub mod sink;
pub mod source;
pub mod suggestion;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use cache::{MemoryCache, SuggestionCache};
pub use config::Config;
pub use query::{Phase, QueryCoordinator, Settlement, SettlementOrigin};
pub use sink::{ConsoleSink, OutputFormat, ResultSink};
pub use source::{HttpSuggestionSource, SourceError, SuggestionSource};
pub use suggestion::{SelectedItem, Suggestion};
