//! Self-refilling worker pool: one task per concurrency slot, each
//! replacing its own completed request until the stop signal is raised.
mod worker;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::args::SuccessRule;
use crate::http::RequestSpec;
use crate::metrics::Aggregate;
use crate::shutdown::ShutdownSender;

use worker::slot_loop;

/// Handles for every slot task of one run. Slot ids are fixed for the
/// whole run; slot `n` only ever replaces its own completed request.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Launches `concurrency` slot tasks at once. Every slot subscribes to
    /// the stop signal before its task is spawned, so a signal raised at
    /// any later point is observed by all of them.
    #[must_use]
    pub fn spawn(
        concurrency: usize,
        client: &Client,
        spec: &Arc<RequestSpec>,
        rule: SuccessRule,
        aggregate: &Arc<Aggregate>,
        shutdown_tx: &ShutdownSender,
    ) -> Self {
        let mut handles = Vec::with_capacity(concurrency);
        for slot in 0..concurrency {
            let slot_client = client.clone();
            let slot_spec = Arc::clone(spec);
            let slot_aggregate = Arc::clone(aggregate);
            let mut shutdown_rx = shutdown_tx.subscribe();
            handles.push(tokio::spawn(async move {
                slot_loop(
                    slot,
                    &slot_client,
                    &slot_spec,
                    rule,
                    &slot_aggregate,
                    &mut shutdown_rx,
                )
                .await;
            }));
        }
        Self { handles }
    }

    /// Waits for every slot to finish its in-flight request, bounded by
    /// `drain_timeout`. Slots still running past the bound are aborted;
    /// their unfinished outcomes are discarded, counted neither as success
    /// nor as failure. Returns `true` on a clean drain.
    pub async fn drain(mut self, drain_timeout: Duration) -> bool {
        let join_all = async {
            for handle in self.handles.iter_mut() {
                if handle.await.is_err() {
                    warn!("Worker slot task failed to join.");
                }
            }
        };

        if timeout(drain_timeout, join_all).await.is_ok() {
            debug!("All worker slots drained cleanly.");
            return true;
        }

        let mut abandoned: usize = 0;
        for handle in &self.handles {
            if !handle.is_finished() {
                handle.abort();
                abandoned = abandoned.saturating_add(1);
            }
        }
        warn!(
            "Drain timeout expired; abandoned {} in-flight request(s).",
            abandoned
        );
        false
    }
}
