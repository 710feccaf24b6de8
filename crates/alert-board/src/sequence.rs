//! Monotonic tickets for fetch results that may complete out of order.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one fetch; a larger ticket was issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

#[derive(Debug, Default)]
pub struct Sequencer {
    next: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued ticket, if any.
    pub fn latest(&self) -> Option<Ticket> {
        match self.next.load(Ordering::SeqCst) {
            0 => None,
            n => Some(Ticket(n)),
        }
    }
}

/// Remembers the newest ticket applied so far.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastApplied {
    last: Option<Ticket>,
}

impl LastApplied {
    /// Record `ticket` if it is newer than anything applied; false otherwise.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        match self.last {
            Some(last) if ticket <= last => false,
            _ => {
                self.last = Some(ticket);
                true
            }
        }
    }

    pub fn last(&self) -> Option<Ticket> {
        self.last
    }
}
