//! Delayed computer turn.
//!
//! The controller does not run timers itself. It hands out a [`TurnTicket`] and the host runs
//! the turn once the ticket is due. Tickets are single use: after the turn runs, the round
//! changes or the ticket is cancelled, presenting it again fails.

use std::time::{Duration, Instant};

/// Handle of a scheduled computer turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnTicket {
    id: u64,
    due: Instant,
}

impl TurnTicket {
    pub(crate) const fn new(id: u64, due: Instant) -> Self {
        Self { id, due }
    }

    /// Unique, increasing ticket number
    #[inline]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Earliest moment the computer may move
    #[inline]
    pub const fn due(&self) -> Instant {
        self.due
    }

    /// Check if the turn may run at `now`
    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    /// Time left until the turn is due, zero if already due
    #[inline]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.due.saturating_duration_since(now)
    }
}

/// Source of tickets, at most one outstanding at a time
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    next_id: u64,
    pending: Option<TurnTicket>,
}

impl Scheduler {
    pub(crate) fn schedule(&mut self, now: Instant, delay: Duration) -> TurnTicket {
        let ticket = TurnTicket::new(self.next_id, now + delay);
        self.next_id += 1;
        self.pending = Some(ticket);
        ticket
    }

    pub(crate) const fn pending(&self) -> Option<TurnTicket> {
        self.pending
    }

    /// Withdraw the outstanding ticket if it matches
    pub(crate) fn take(&mut self, ticket: TurnTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn cancel(&mut self) -> Option<TurnTicket> {
        self.pending.take()
    }
}
