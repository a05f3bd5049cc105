//! Quiet-period debouncing for high-frequency triggers such as live typing.
//!
//! Pure and I/O-free: the caller passes `now` and sleeps until [`Debouncer::deadline`].

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn set_quiet(&mut self, quiet: Duration) {
        self.quiet = quiet;
    }

    /// Replaces any pending value and restarts the quiet period.
    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.quiet, value));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Returns the pending value once its quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if *at <= now => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
