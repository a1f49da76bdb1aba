// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunTicket(u64);

impl RunTicket {
    /// Returns the generation number of this ticket.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Last-write-wins guard for asynchronously computed results.
///
/// Every run takes a ticket; only the result for the most recently issued
/// ticket is accepted.
#[derive(Debug, Default)]
pub struct LatestOnly {
    generation: AtomicU64,
}

impl LatestOnly {
    /// Creates a guard with no tickets issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
        }
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn issue(&self) -> RunTicket {
        RunTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns whether `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: RunTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Returns `value` if `ticket` is still current, otherwise discards it.
    pub fn accept<T>(&self, ticket: RunTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(
                ticket = ticket.0,
                "Discarding result computed for a superseded selection"
            );
            None
        }
    }
}
