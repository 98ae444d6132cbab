//! Query coordinator
//!
//! Drives one input stream through normalize, debounce, cache check,
//! remote lookup and cache population. Every input change, selection and
//! disposal bumps the generation; a lookup outcome only reaches the visible
//! list if its generation is still current when it arrives. In-flight
//! lookups are never cancelled for staleness, their effect is just dropped.
//!
//! The coordinator is single-threaded. The owning event loop calls
//! `on_input`/`select` as events arrive and `tick` periodically to fire
//! the debounce and collect worker responses.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::time::Instant;

use serde::Serialize;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;

use crate::cache::SuggestionCache;
use crate::config::SuggestConfig;
use crate::query::debouncer::Debouncer;
use crate::query::normalize::{NormalizedQuery, normalize};
use crate::query::worker::{FetchRequest, FetchResponse, spawn_worker};
use crate::sink::ResultSink;
use crate::source::{SourceError, SuggestionSource};
use crate::suggestion::{SelectedItem, Suggestion};

/// Where an input stream is in its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Debouncing,
    Fetching,
    Settled,
}

/// How a settlement was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementOrigin {
    /// Input below the minimum length; nothing was consulted
    TooShort,
    CacheHit,
    Remote,
    /// Remote lookup succeeded with no results
    RemoteEmpty,
    /// Remote lookup failed; list comes from a second cache read, or is empty
    Fallback,
}

impl SettlementOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            SettlementOrigin::TooShort => "too short",
            SettlementOrigin::CacheHit => "cached",
            SettlementOrigin::Remote => "remote",
            SettlementOrigin::RemoteEmpty => "remote",
            SettlementOrigin::Fallback => "fallback",
        }
    }
}

/// Final visible result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub query: NormalizedQuery,
    pub generation: u64,
    pub origin: SettlementOrigin,
    pub suggestions: Vec<Suggestion>,
}

/// Lookup armed in the debouncer, generation captured by value
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingLookup {
    generation: u64,
    query: NormalizedQuery,
}

/// Texts that must not reopen the list after a selection
#[derive(Debug, Clone)]
struct AcceptedSelection {
    /// Raw input at the time of selection
    input: String,
    /// Label of the chosen suggestion
    label: String,
}

impl AcceptedSelection {
    fn matches(&self, raw: &str) -> bool {
        raw == self.input || raw == self.label
    }
}

pub struct QueryCoordinator {
    min_query_len: usize,
    item_kind: String,
    debouncer: Debouncer<PendingLookup>,
    cache: Box<dyn SuggestionCache>,
    sink: Option<Box<dyn ResultSink>>,
    /// Current generation; 0 before the first input
    generation: u64,
    phase: Phase,
    raw_input: String,
    /// Visible list, replaced wholesale on each settlement
    suggestions: Vec<Suggestion>,
    settlement: Option<Settlement>,
    /// Query of the current generation's outstanding lookup
    fetching: Option<NormalizedQuery>,
    last_accepted: Option<AcceptedSelection>,
    /// Channel to send lookups to the worker
    request_tx: Option<UnboundedSender<FetchRequest>>,
    /// Channel to receive lookup outcomes from the worker
    response_rx: Option<Receiver<FetchResponse>>,
    /// Cancelled on disposal to abandon in-flight lookups
    shutdown: CancellationToken,
    disposed: bool,
}

impl QueryCoordinator {
    /// Create a coordinator with no worker attached
    ///
    /// Until `set_channels` is called every cache miss settles through the
    /// failure fallback.
    pub fn new(config: &SuggestConfig, cache: Box<dyn SuggestionCache>) -> Self {
        Self {
            min_query_len: config.min_query_len,
            item_kind: config.item_kind.clone(),
            debouncer: Debouncer::new(config.debounce_ms),
            cache,
            sink: None,
            generation: 0,
            phase: Phase::Idle,
            raw_input: String::new(),
            suggestions: Vec::new(),
            settlement: None,
            fetching: None,
            last_accepted: None,
            request_tx: None,
            response_rx: None,
            shutdown: CancellationToken::new(),
            disposed: false,
        }
    }

    /// Create a coordinator backed by a fetch worker thread for `source`
    pub fn with_source(
        config: &SuggestConfig,
        cache: Box<dyn SuggestionCache>,
        source: Arc<dyn SuggestionSource>,
    ) -> Self {
        let mut coordinator = Self::new(config, cache);

        let (request_tx, request_rx) = unbounded_channel();
        let (response_tx, response_rx) = channel();
        let shutdown = CancellationToken::new();

        spawn_worker(source, request_rx, response_tx, shutdown.clone());
        coordinator.set_channels(request_tx, response_rx, shutdown);
        coordinator
    }

    /// Set the channel handles for communication with the worker thread
    pub fn set_channels(
        &mut self,
        request_tx: UnboundedSender<FetchRequest>,
        response_rx: Receiver<FetchResponse>,
        shutdown: CancellationToken,
    ) {
        self.request_tx = Some(request_tx);
        self.response_rx = Some(response_rx);
        self.shutdown = shutdown;
    }

    pub fn set_sink(&mut self, sink: Box<dyn ResultSink>) {
        self.sink = Some(sink);
    }

    pub fn on_input(&mut self, raw: &str) {
        self.on_input_at(raw, Instant::now());
    }

    /// Handle a raw input change observed at `now`
    pub fn on_input_at(&mut self, raw: &str, now: Instant) {
        if self.disposed {
            return;
        }

        self.raw_input = raw.to_string();
        self.generation = self.generation.wrapping_add(1);

        if self
            .last_accepted
            .as_ref()
            .is_some_and(|accepted| accepted.matches(raw))
        {
            log::debug!("Input matches last accepted selection, not re-triggering");
            self.debouncer.cancel();
            self.suggestions.clear();
            self.settlement = None;
            self.fetching = None;
            self.phase = Phase::Idle;
            return;
        }

        let query = normalize(raw);
        if query.is_empty() || query.is_too_short(self.min_query_len) {
            self.debouncer.cancel();
            self.settle(query, Vec::new(), SettlementOrigin::TooShort);
            return;
        }

        log::debug!(
            "Scheduling lookup for '{}' (generation {})",
            query,
            self.generation
        );
        self.phase = Phase::Debouncing;
        self.debouncer.schedule_at(
            PendingLookup {
                generation: self.generation,
                query,
            },
            now,
        );
    }

    /// Fire the debounce if due and apply worker responses.
    ///
    /// Returns true if any state changed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }

        let mut changed = false;
        if let Some(pending) = self.debouncer.take_ready_at(now) {
            self.run_lookup(pending);
            changed = true;
        }
        changed |= self.poll_responses();
        changed
    }

    /// Accept the visible suggestion with `id`
    ///
    /// Clears the list and suppresses re-triggering while the input still
    /// reads the same text. Returns `None` if no visible suggestion has
    /// that id.
    pub fn select(&mut self, id: &str) -> Option<SelectedItem> {
        if self.disposed {
            return None;
        }

        let suggestion = self.suggestions.iter().find(|s| s.id == id)?.clone();
        let item = SelectedItem::from_suggestion(&suggestion, &self.item_kind);

        self.last_accepted = Some(AcceptedSelection {
            input: self.raw_input.clone(),
            label: suggestion.primary_common_name,
        });
        // Outcomes still in flight must not reopen the list
        self.generation = self.generation.wrapping_add(1);
        self.debouncer.cancel();
        self.suggestions.clear();
        self.settlement = None;
        self.phase = Phase::Idle;

        log::debug!("Selected '{}' ({})", item.label, item.id);
        if let Some(sink) = self.sink.as_mut() {
            sink.selected(&item);
        }
        Some(item)
    }

    /// Accept the visible suggestion at `index` (0-based)
    pub fn select_index(&mut self, index: usize) -> Option<SelectedItem> {
        let id = self.suggestions.get(index)?.id.clone();
        self.select(&id)
    }

    /// Tear the stream down
    ///
    /// Cancels the pending debounce and abandons in-flight lookups. Later
    /// input, ticks and selections are ignored.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.debouncer.cancel();
        self.shutdown.cancel();
        self.request_tx = None;
        self.response_rx = None;
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::Idle;
        log::debug!("Query coordinator disposed");
    }

    /// Visible suggestions
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// No debounce pending and no current lookup outstanding
    pub fn is_settled(&self) -> bool {
        !matches!(self.phase, Phase::Debouncing | Phase::Fetching)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn run_lookup(&mut self, pending: PendingLookup) {
        if pending.generation != self.generation {
            log::debug!(
                "Dropping superseded lookup for generation {} (current: {})",
                pending.generation,
                self.generation
            );
            return;
        }

        match self.cache.get(pending.query.as_str()) {
            Ok(Some(cached)) if !cached.is_empty() => {
                log::debug!("Cache hit for '{}'", pending.query);
                self.settle(pending.query, cached, SettlementOrigin::CacheHit);
                return;
            }
            Ok(_) => {}
            Err(e) => log::warn!(
                "Cache read for '{}' failed, treating as miss: {}",
                pending.query,
                e
            ),
        }

        self.phase = Phase::Fetching;
        self.fetching = Some(pending.query.clone());
        self.dispatch(FetchRequest {
            query: pending.query,
            generation: pending.generation,
        });
    }

    /// Send a lookup to the worker; a missing or dead worker counts as a
    /// failed lookup
    fn dispatch(&mut self, request: FetchRequest) {
        let Some(tx) = self.request_tx.as_ref() else {
            self.apply_response(FetchResponse::from_request(
                request,
                Err(SourceError::Unavailable {
                    message: "no fetch worker attached".to_string(),
                }),
            ));
            return;
        };

        if let Err(send_error) = tx.send(request) {
            log::error!("Fetch worker disconnected - send failed");
            self.request_tx = None;
            self.apply_response(FetchResponse::from_request(
                send_error.0,
                Err(SourceError::Unavailable {
                    message: "fetch worker disconnected".to_string(),
                }),
            ));
        }
    }

    /// Drain all available worker responses (non-blocking)
    fn poll_responses(&mut self) -> bool {
        let Some(rx) = self.response_rx.take() else {
            return false;
        };

        let mut responses = Vec::new();
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(response) => responses.push(response),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if disconnected {
            log::error!("Fetch worker disconnected");
            self.request_tx = None;
        } else {
            self.response_rx = Some(rx);
        }

        let mut changed = false;
        for response in responses {
            changed |= self.apply_response(response);
        }

        // A current lookup that will never be answered settles as failed
        if disconnected
            && self.phase == Phase::Fetching
            && let Some(query) = self.fetching.take()
        {
            changed |= self.apply_response(FetchResponse {
                query,
                generation: self.generation,
                result: Err(SourceError::Unavailable {
                    message: "fetch worker disconnected".to_string(),
                }),
            });
        }

        changed
    }

    /// Apply one lookup outcome. Returns true if the visible list changed.
    fn apply_response(&mut self, response: FetchResponse) -> bool {
        let FetchResponse {
            query,
            generation,
            result,
        } = response;
        let is_current = generation == self.generation && !self.disposed;

        match result {
            Ok(suggestions) if !suggestions.is_empty() => {
                // Keyed by query, so even a stale write is accurate
                if let Err(e) = self.cache.put(query.as_str(), suggestions.clone()) {
                    log::warn!("Cache write for '{}' failed: {}", query, e);
                }
                if !is_current {
                    log::debug!(
                        "Ignoring stale result for '{}' from generation {} (current: {})",
                        query,
                        generation,
                        self.generation
                    );
                    return false;
                }
                self.settle(query, suggestions, SettlementOrigin::Remote);
                true
            }
            Ok(_) => {
                if !is_current {
                    return false;
                }
                self.settle(query, Vec::new(), SettlementOrigin::RemoteEmpty);
                true
            }
            Err(error) => {
                log::warn!("Suggestion lookup for '{}' failed: {}", query, error);
                if let Some(sink) = self.sink.as_mut() {
                    sink.lookup_failed(&query, &error);
                }
                if !is_current {
                    return false;
                }

                // Another generation may have filled the entry meanwhile
                let fallback = match self.cache.get(query.as_str()) {
                    Ok(Some(cached)) => cached,
                    Ok(None) => Vec::new(),
                    Err(e) => {
                        log::warn!("Fallback cache read for '{}' failed: {}", query, e);
                        Vec::new()
                    }
                };
                self.settle(query, fallback, SettlementOrigin::Fallback);
                true
            }
        }
    }

    fn settle(
        &mut self,
        query: NormalizedQuery,
        suggestions: Vec<Suggestion>,
        origin: SettlementOrigin,
    ) {
        log::debug!(
            "Settled '{}' (generation {}) with {} suggestions via {:?}",
            query,
            self.generation,
            suggestions.len(),
            origin
        );

        self.phase = Phase::Settled;
        self.fetching = None;
        self.suggestions = suggestions.clone();
        let settlement = Settlement {
            query,
            generation: self.generation,
            origin,
            suggestions,
        };
        if let Some(sink) = self.sink.as_mut() {
            sink.settled(&settlement);
        }
        self.settlement = Some(settlement);
    }
}

impl Drop for QueryCoordinator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod coordinator_tests;
