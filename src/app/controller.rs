use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep};
use tracing::{debug, info};

use crate::error::AppResult;
use crate::http::{self, RequestSpec};
use crate::metrics::{Aggregate, RunResult};
use crate::pool::WorkerPool;
use crate::shutdown::ShutdownSender;
use crate::ui::ProgressView;

use super::RunConfig;

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Stopping,
    Done,
}

/// Owns the duration timer, the stop signal, and the sampling cadence for
/// a single run. Every call to [`RunController::run`] constructs fresh
/// aggregate state; nothing carries over between runs.
pub struct RunController {
    shutdown_tx: ShutdownSender,
    phase_tx: watch::Sender<RunPhase>,
}

impl RunController {
    #[must_use]
    pub fn new(shutdown_tx: ShutdownSender) -> Self {
        let (phase_tx, _) = watch::channel(RunPhase::Idle);
        Self {
            shutdown_tx,
            phase_tx,
        }
    }

    /// Observe `Idle -> Running -> Stopping -> Done` transitions.
    #[must_use]
    pub fn phase(&self) -> watch::Receiver<RunPhase> {
        self.phase_tx.subscribe()
    }

    fn set_phase(&self, phase: RunPhase) {
        self.phase_tx.send_replace(phase);
    }

    /// Drives one complete run to `Done` and returns its frozen result.
    ///
    /// The duration timer elapsing and an externally raised stop signal
    /// share one exit path: transition to `Stopping`, broadcast the stop
    /// signal, drain the pool bounded by the configured drain timeout,
    /// then freeze the final snapshot. Cancellation therefore produces a
    /// valid (possibly truncated) result, never an error.
    ///
    /// # Errors
    ///
    /// Fails only for pre-run configuration problems (HTTP client
    /// construction). Individual request failures during the run are
    /// counted, never propagated.
    pub async fn run(&self, config: &RunConfig, view: &mut dyn ProgressView) -> AppResult<RunResult> {
        let client = http::build_client(
            config.request_timeout,
            config.connect_timeout,
            config.redirect_limit,
        )?;
        let spec = Arc::new(RequestSpec {
            method: config.method,
            url: config.target.clone(),
            headers: config.headers.clone(),
            form: config.form.clone(),
        });

        // Subscribed before the pool exists, so an external stop raised at
        // any point during the run is observed here.
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let run_start = Instant::now();
        let aggregate = Arc::new(Aggregate::new());
        self.set_phase(RunPhase::Running);
        let pool = WorkerPool::spawn(
            config.concurrency,
            &client,
            &spec,
            config.success_rule,
            &aggregate,
            &self.shutdown_tx,
        );
        info!(
            "Run started: {} slot(s) against {} for {}s.",
            config.concurrency,
            config.target,
            config.duration.as_secs()
        );

        let mut sample_ticks = interval(config.sample_interval);
        sample_ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let deadline = sleep(config.duration);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                () = &mut deadline => {
                    debug!("Run duration elapsed.");
                    break;
                }
                _ = shutdown_rx.recv() => {
                    info!("Stop requested before the duration elapsed.");
                    break;
                }
                _ = sample_ticks.tick() => {
                    view.on_snapshot(&aggregate.snapshot(), config.duration);
                }
            }
        }

        self.set_phase(RunPhase::Stopping);
        drop(self.shutdown_tx.send(()));
        let clean_drain = pool.drain(config.drain_timeout).await;

        let snapshot = aggregate.snapshot();
        let wall_clock = run_start.elapsed();
        view.finish();
        self.set_phase(RunPhase::Done);
        info!(
            "Run complete: {} request(s) in {}ms.",
            snapshot.total,
            wall_clock.as_millis()
        );

        Ok(RunResult {
            snapshot,
            wall_clock,
            clean_drain,
        })
    }
}
