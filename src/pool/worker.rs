use reqwest::Client;
use tokio::sync::broadcast::error::TryRecvError;

use crate::args::SuccessRule;
use crate::http::{self, RequestSpec};
use crate::metrics::Aggregate;
use crate::shutdown::ShutdownReceiver;

/// One concurrency slot: issue a request, record the outcome, resubmit.
///
/// The in-flight request is never raced against the stop signal; the
/// check sits between iterations, so an in-flight request always finishes
/// and is counted, and the slot stops resubmitting within at most one
/// request duration of the signal.
pub(super) async fn slot_loop(
    slot: usize,
    client: &Client,
    spec: &RequestSpec,
    rule: SuccessRule,
    aggregate: &Aggregate,
    shutdown_rx: &mut ShutdownReceiver,
) {
    loop {
        match shutdown_rx.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(()) | Err(TryRecvError::Closed) | Err(TryRecvError::Lagged(_)) => break,
        }

        let outcome = http::execute(client, spec, slot, rule).await;
        aggregate.record(outcome);
    }
}
