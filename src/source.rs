//! Remote suggestion source abstraction
//!
//! Defines the `SuggestionSource` capability, its error type, and the HTTP
//! implementation used by the binary. The coordinator never sees a
//! `SourceError` as a failure of its own; every variant is recovered via the
//! cache fallback.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::suggestion::Suggestion;

mod http;

pub use http::HttpSuggestionSource;

/// Errors that can occur during a remote lookup
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    /// Transport failure (connection refused, timeout, DNS)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Remote service asked us to slow down (HTTP 429)
    #[error("Rate limited{}", retry_suffix(.retry_after))]
    RateLimited { retry_after: Option<u64> },

    /// Remote service returned a non-success status
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// Response body could not be decoded
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Query could not be turned into a request URL
    #[error("Invalid request URL: {message}")]
    InvalidUrl { message: String },

    /// No worker is available to run the lookup
    #[error("Suggestion source unavailable: {message}")]
    Unavailable { message: String },
}

fn retry_suffix(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!(" (retry after {}s)", secs),
        None => String::new(),
    }
}

/// Async lookup of suggestions for a normalized query
pub trait SuggestionSource: Send + Sync {
    fn fetch<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<Suggestion>, SourceError>>;

    /// Short name used in log lines
    fn name(&self) -> &'static str {
        "remote"
    }
}
