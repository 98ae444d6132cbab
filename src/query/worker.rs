//! Fetch Worker Module
//!
//! Runs remote suggestion lookups in a background thread so the input loop
//! never waits on the network.
//!
//! ## Architecture
//!
//! - Single background thread hosting a current-thread tokio runtime
//! - Requests arrive on an unbounded tokio channel, responses leave on a
//!   std::sync::mpsc channel polled by the coordinator
//! - Every request runs as its own task, so lookups for older generations
//!   keep running while newer ones start; staleness is decided by the
//!   coordinator, not here
//! - A shutdown token abandons all in-flight lookups on disposal
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::sync::mpsc::channel;
//! use tokio_util::sync::CancellationToken;
//!
//! let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel();
//! let (response_tx, response_rx) = channel();
//! let shutdown = CancellationToken::new();
//!
//! spawn_worker(Arc::new(source), request_rx, response_tx, shutdown.clone());
//!
//! request_tx.send(FetchRequest { query: normalize("lion"), generation: 1 })?;
//! let response = response_rx.recv()?;
//! ```

pub mod thread;
pub mod types;

// Re-exports for convenience
pub use thread::spawn_worker;
pub use types::{FetchRequest, FetchResponse};
