//! Fetch Worker Types
//!
//! Messages exchanged between the coordinator and the fetch worker. Both
//! directions carry the generation so the coordinator can drop stale
//! outcomes.

use crate::query::normalize::NormalizedQuery;
use crate::source::SourceError;
use crate::suggestion::Suggestion;

/// Request to look up suggestions remotely
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub query: NormalizedQuery,
    /// Generation that was current when the lookup was scheduled
    pub generation: u64,
}

/// Outcome of a remote lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub query: NormalizedQuery,
    /// Echoed from the request
    pub generation: u64,
    pub result: Result<Vec<Suggestion>, SourceError>,
}

impl FetchResponse {
    pub fn from_request(
        request: FetchRequest,
        result: Result<Vec<Suggestion>, SourceError>,
    ) -> Self {
        Self {
            query: request.query,
            generation: request.generation,
            result,
        }
    }
}
