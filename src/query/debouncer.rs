//! Debounced lookup scheduling
//!
//! Holds at most one pending trigger. Scheduling again before the quiet
//! period elapses replaces the trigger and restarts the period, so only the
//! most recent trigger is ever handed back. The owner polls `take_ready()`
//! from its event loop.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug)]
pub struct Debouncer<T> {
    /// Quiet period required before the pending trigger fires
    delay: Duration,
    /// Trigger and the time it was armed
    pending: Option<(T, Instant)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            pending: None,
        }
    }

    pub fn schedule(&mut self, trigger: T) {
        self.schedule_at(trigger, Instant::now());
    }

    /// Arm the timer as of `now`, discarding any previously pending trigger
    pub fn schedule_at(&mut self, trigger: T, now: Instant) {
        self.pending = Some((trigger, now));
    }

    /// Drop the pending trigger, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn take_ready(&mut self) -> Option<T> {
        self.take_ready_at(Instant::now())
    }

    /// Hand back the pending trigger if the quiet period has elapsed by `now`
    pub fn take_ready_at(&mut self, now: Instant) -> Option<T> {
        let armed_at = self.pending.as_ref().map(|(_, armed_at)| *armed_at)?;
        if now.saturating_duration_since(armed_at) < self.delay {
            return None;
        }
        self.pending.take().map(|(trigger, _)| trigger)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
#[path = "debouncer_tests.rs"]
mod debouncer_tests;
