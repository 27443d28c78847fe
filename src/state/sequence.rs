//! Last-request-wins sequencing for overlapping async loads.
//!
//! A consumer issues a [`Ticket`] before each request and hands it back with
//! the response. Only the most recently issued ticket is accepted; older
//! completions are dropped so a slow earlier response can never overwrite a
//! newer one.

#[cfg(test)]
#[path = "sequence_test.rs"]
mod sequence_test;

use std::sync::atomic::{AtomicU64, Ordering};

/// Position of one request in its sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket that supersedes every earlier one.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    #[must_use]
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Keep `value` only if `ticket` is still the latest.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_latest(ticket) {
            Some(value)
        } else {
            tracing::debug!(ticket = ticket.0, "discarding stale response");
            None
        }
    }
}
