//! Fetch Worker Thread
//!
//! Hosts a current-thread tokio runtime that receives fetch requests,
//! runs each against the suggestion source as its own task, and sends the
//! outcomes back to the coordinator.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use super::types::{FetchRequest, FetchResponse};
use crate::source::SuggestionSource;

/// Spawn the fetch worker thread
///
/// The thread runs until the request channel closes or `shutdown` is
/// cancelled. Lookups still in flight at that point are abandoned without a
/// response.
///
/// # Arguments
/// * `source` - Remote suggestion source shared by all lookups
/// * `request_rx` - Channel to receive requests from the coordinator
/// * `response_tx` - Channel to send outcomes back to the coordinator
/// * `shutdown` - Token cancelled on disposal
pub fn spawn_worker(
    source: Arc<dyn SuggestionSource>,
    request_rx: UnboundedReceiver<FetchRequest>,
    response_tx: Sender<FetchResponse>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    // Dropping the receiver makes every later send fail,
                    // which the coordinator treats as a failed lookup
                    log::error!("Failed to create fetch worker runtime: {}", e);
                    return;
                }
            };

            rt.block_on(worker_loop(source, request_rx, response_tx, shutdown));
        }));

        if let Err(e) = result {
            let panic_msg = if let Some(s) = e.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = e.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            log::error!("Fetch worker thread panicked: {}", panic_msg);
        }
    })
}

/// Main async loop - dispatches requests until the channel closes or
/// shutdown is requested
async fn worker_loop(
    source: Arc<dyn SuggestionSource>,
    mut request_rx: UnboundedReceiver<FetchRequest>,
    response_tx: Sender<FetchResponse>,
    shutdown: CancellationToken,
) {
    log::debug!("Fetch worker started ({} source)", source.name());

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                log::debug!("Fetch worker shutdown requested");
                break;
            }

            request = request_rx.recv() => {
                let Some(request) = request else {
                    break;
                };
                log::debug!(
                    "Worker received request for generation {}: '{}'",
                    request.generation,
                    request.query
                );
                tokio::spawn(handle_request(
                    Arc::clone(&source),
                    request,
                    response_tx.clone(),
                    shutdown.clone(),
                ));
            }
        }
    }

    log::debug!("Fetch worker shutting down");
}

/// Run a single lookup and report its outcome
async fn handle_request(
    source: Arc<dyn SuggestionSource>,
    request: FetchRequest,
    response_tx: Sender<FetchResponse>,
    shutdown: CancellationToken,
) {
    let result = tokio::select! {
        biased;

        _ = shutdown.cancelled() => {
            log::debug!("Abandoning lookup for generation {}", request.generation);
            return;
        }

        result = source.fetch(request.query.as_str()) => result,
    };

    match &result {
        Ok(suggestions) => log::debug!(
            "Lookup for generation {} returned {} suggestions",
            request.generation,
            suggestions.len()
        ),
        Err(e) => log::debug!("Lookup for generation {} failed: {}", request.generation, e),
    }

    // Coordinator gone means nobody is listening
    let _ = response_tx.send(FetchResponse::from_request(request, result));
}

#[cfg(test)]
#[path = "thread_tests.rs"]
mod thread_tests;
