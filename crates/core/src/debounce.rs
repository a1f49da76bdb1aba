// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Coalescing of high-frequency toggle bursts.
//!
//! A [`Debouncer`] does not own any work. It records that events happened
//! and tells the caller when the burst has gone quiet for a full window, or
//! has been running for longer than the optional maximum wait.
//!
//! ```text
//! t=0ms    record()            pending, not ready
//! t=150ms  record()            pending, not ready (window restarts)
//! t=349ms  poll() -> None
//! t=350ms  poll() -> Some(2)   burst of two events committed
//! ```

use demand_matrix_domain::Clock;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Quiet-period debouncer driven by an injected clock.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    max_wait: Option<Duration>,
    clock: Arc<dyn Clock>,
    first_event: Option<Instant>,
    last_event: Option<Instant>,
    pending: usize,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet window and no maximum wait.
    #[must_use]
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window,
            max_wait: None,
            clock,
            first_event: None,
            last_event: None,
            pending: 0,
        }
    }

    /// Caps how long a continuous burst can defer readiness.
    #[must_use]
    pub const fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Returns the quiet window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Records one event of the current burst.
    pub fn record(&mut self) {
        let now: Instant = self.clock.now();
        if self.first_event.is_none() {
            self.first_event = Some(now);
        }
        self.last_event = Some(now);
        self.pending += 1;
    }

    /// Returns whether events are waiting to be committed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending > 0
    }

    /// Returns whether the pending burst may be committed now.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        let (Some(first), Some(last)) = (self.first_event, self.last_event) else {
            return false;
        };

        let now: Instant = self.clock.now();
        if now.duration_since(last) >= self.window {
            return true;
        }
        self.max_wait
            .is_some_and(|max_wait| now.duration_since(first) >= max_wait)
    }

    /// Takes the pending burst if it is ready.
    ///
    /// Returns the number of events coalesced, or `None` if nothing is
    /// ready yet.
    pub fn poll(&mut self) -> Option<usize> {
        if self.is_ready() {
            Some(self.take())
        } else {
            None
        }
    }

    /// Takes the pending burst regardless of the window.
    ///
    /// Returns the number of events coalesced, or `None` if nothing was
    /// pending.
    pub fn flush(&mut self) -> Option<usize> {
        if self.is_pending() {
            Some(self.take())
        } else {
            None
        }
    }

    /// Drops any pending burst without committing it.
    pub fn cancel(&mut self) {
        self.take();
    }

    fn take(&mut self) -> usize {
        self.first_event = None;
        self.last_event = None;
        std::mem::take(&mut self.pending)
    }
}
