use std::time::Duration;

/// Classified result of a single request, produced by the executor and
/// consumed immediately by the aggregate.
#[derive(Clone, Copy, Debug)]
pub struct RequestOutcome {
    pub success: bool,
    /// HTTP status of the response, or 0 when the transport failed before
    /// any response arrived.
    pub status: u16,
    /// Stable slot id of the worker that issued the request.
    pub worker: usize,
}

/// Consistent point-in-time copy of the live counters. Snapshots are
/// plain values; holding one never blocks or perturbs recording.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub total: u64,
    pub success: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

impl Snapshot {
    /// Requests per second, fixed-point scaled by 100. The elapsed
    /// denominator is floored to one millisecond so a snapshot taken at
    /// run start cannot divide by zero.
    #[must_use]
    pub fn rate_x100(&self) -> u64 {
        let elapsed_ms = self.elapsed.as_millis().max(1);
        let scaled = u128::from(self.total)
            .saturating_mul(100_000)
            .checked_div(elapsed_ms)
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    /// Successful share of all requests, percent scaled by 100.
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        let scaled = u128::from(self.success)
            .saturating_mul(10_000)
            .checked_div(u128::from(self.total))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

/// Frozen outcome of one run, produced exactly once when the controller
/// reaches `Done`.
#[derive(Debug, Clone, Copy)]
pub struct RunResult {
    pub snapshot: Snapshot,
    pub wall_clock: Duration,
    /// False when the drain timeout expired and still-outstanding requests
    /// were abandoned (excluded from every count).
    pub clean_drain: bool,
}
