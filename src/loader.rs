//! Tri-state widget results and the per-key refresh cell.
//!
//! Each widget owns a `LoaderCell`. A refresh takes a ticket (monotonically
//! increasing per cell), performs its fetch, and applies the whole tri-state
//! value back through the ticket. The source system gives no ordering
//! guarantee across in-flight requests, so a response carrying a ticket
//! older than the latest applied one is discarded — last issuance wins, not
//! last arrival. Values replace atomically; there is no partial merge.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::WidgetError;

/// Result of one widget load.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState<T> {
    Loading,
    Loaded {
        value: T,
        /// True when served from cache after a failed live fetch.
        stale: bool,
    },
    Errored(WidgetError),
}

impl<T> WidgetState<T> {
    pub fn fresh(value: T) -> Self {
        WidgetState::Loaded {
            value,
            stale: false,
        }
    }

    pub fn stale(value: T) -> Self {
        WidgetState::Loaded { value, stale: true }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            WidgetState::Loaded { value, .. } => Some(value),
            _ => None,
        }
    }

    /// True when the widget should show its empty state.
    pub fn is_empty_state(&self) -> bool {
        matches!(self, WidgetState::Errored(e) if e.is_empty_state())
    }
}

impl<T> From<Result<T, WidgetError>> for WidgetState<T> {
    fn from(result: Result<T, WidgetError>) -> Self {
        match result {
            Ok(value) => WidgetState::fresh(value),
            Err(e) => WidgetState::Errored(e),
        }
    }
}

/// Ticket for one in-flight refresh of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

struct Applied<T> {
    seq: u64,
    state: WidgetState<T>,
}

/// One widget's refresh cell: current tri-state value plus the sequencing
/// that guards against out-of-order completions.
pub struct LoaderCell<T> {
    issued: AtomicU64,
    applied: Mutex<Applied<T>>,
}

impl<T: Clone> LoaderCell<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            applied: Mutex::new(Applied {
                seq: 0,
                state: WidgetState::Loading,
            }),
        }
    }

    /// Issue a ticket for a new refresh. The previous value stays on screen
    /// while the fetch runs.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Apply a completed refresh. Returns false (and changes nothing) when a
    /// later-issued refresh already applied its result.
    pub fn apply(&self, ticket: RequestTicket, state: WidgetState<T>) -> bool {
        let mut guard = self.applied.lock();
        if ticket.0 < guard.seq {
            log::debug!(
                "discarding superseded refresh result (ticket {} < {})",
                ticket.0,
                guard.seq
            );
            return false;
        }
        guard.seq = ticket.0;
        guard.state = state;
        true
    }

    /// Current tri-state value.
    pub fn get(&self) -> WidgetState<T> {
        self.applied.lock().state.clone()
    }
}

impl<T: Clone> Default for LoaderCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
