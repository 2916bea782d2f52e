//! Request tickets and the per-tier load state.

use std::fmt;

/// Generation token for one fetch. Issued in increasing order; a completion
/// is only applied if the tier is still waiting on the same ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub(crate) struct TicketIssuer {
    next: u64,
}

impl TicketIssuer {
    pub(crate) fn issue(&mut self) -> Ticket {
        self.next += 1;
        Ticket(self.next)
    }
}

/// Which level of the drill-down a fetch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierKind {
    Stations,
    Measurements,
    Readings,
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TierKind::Stations => "stations",
            TierKind::Measurements => "measurements",
            TierKind::Readings => "readings",
        };
        f.write_str(name)
    }
}

/// Load state of one tier's data.
#[derive(Debug, Clone, PartialEq)]
pub enum Tier<T> {
    Idle,
    Loading(Ticket),
    Ready(T),
    /// Reason for the failure, for logs and tooltips
    Failed(String),
}

impl<T> Default for Tier<T> {
    fn default() -> Self {
        Tier::Idle
    }
}

impl<T> Tier<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Tier::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Tier::Loading(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Tier::Failed(_))
    }

    pub fn is_awaiting(&self, ticket: Ticket) -> bool {
        matches!(self, Tier::Loading(pending) if *pending == ticket)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Tier::Ready(data) => Some(data),
            _ => None,
        }
    }
}
