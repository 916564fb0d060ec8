use std::sync::{Mutex, PoisonError};

use tokio::time::Instant;

use super::{RequestOutcome, Snapshot};

#[derive(Debug, Default, Clone, Copy)]
struct CounterState {
    total: u64,
    success: u64,
    failed: u64,
}

/// Live run counters with concurrent writers (every worker slot) and
/// concurrent readers (the controller's sampling loop).
///
/// One mutex guards the whole counter triple: `record` and `snapshot` are
/// linearizable with respect to each other, so `total == success + failed`
/// holds at every observable instant and a snapshot can never be torn.
/// The critical sections are a handful of integer operations; contention
/// is negligible next to a network round-trip.
#[derive(Debug)]
pub struct Aggregate {
    counters: Mutex<CounterState>,
    started: Instant,
}

impl Aggregate {
    /// Fresh counters, stamped with the creation instant. One aggregate
    /// serves exactly one run; a repeat run constructs a new one.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(CounterState::default()),
            started: Instant::now(),
        }
    }

    /// Folds one outcome into the counters. `total` and exactly one of
    /// `success`/`failed` move together under the lock.
    pub fn record(&self, outcome: RequestOutcome) {
        let mut counters = self
            .counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        counters.total = counters.total.saturating_add(1);
        if outcome.success {
            counters.success = counters.success.saturating_add(1);
        } else {
            counters.failed = counters.failed.saturating_add(1);
        }
    }

    /// Copies the counters at a single instant.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let counters = *self
            .counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            total: counters.total,
            success: counters.success,
            failed: counters.failed,
            elapsed: self.started.elapsed(),
        }
    }
}

impl Default for Aggregate {
    fn default() -> Self {
        Self::new()
    }
}
