use std::io::IsTerminal;

use clap::Parser;
use tracing::warn;

use crate::app::{RunConfig, RunController, print_summary};
use crate::args::LoadArgs;
use crate::error::AppResult;
use crate::metrics::RunResult;
use crate::shutdown::{setup_signal_shutdown_handler, shutdown_channel};
use crate::sinks::{self, RunRecord};
use crate::ui::{ProgressView, Silent, StatusLine};

pub(crate) fn run() -> AppResult<()> {
    let args = LoadArgs::parse();
    crate::logger::init_logging(args.verbose);

    // Configuration problems surface here, before any runtime exists.
    let config = RunConfig::from_args(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(&args, &config))
}

async fn run_async(args: &LoadArgs, config: &RunConfig) -> AppResult<()> {
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let live = !args.no_live && std::io::stderr().is_terminal();
    let mut view: Box<dyn ProgressView> = if live {
        Box::new(StatusLine::new(args.no_color))
    } else {
        Box::new(Silent)
    };

    let controller = RunController::new(shutdown_tx);
    let result = controller.run(config, view.as_mut()).await?;

    // The controller broadcast the stop signal on its way out, so the
    // signal task has already observed it.
    signal_handle.await?;

    print_summary(config, &result);
    write_reports(args, config, &result).await;

    Ok(())
}

async fn write_reports(args: &LoadArgs, config: &RunConfig, result: &RunResult) {
    if args.run_log.is_none() && args.export_json.is_none() {
        return;
    }

    let record = RunRecord {
        timestamp: sinks::utc_timestamp(),
        target: config.target.to_string(),
        duration_s: result.wall_clock.as_secs(),
        concurrency: config.concurrency,
        total: result.snapshot.total,
        success: result.snapshot.success,
        failed: result.snapshot.failed,
        rate_x100: result.snapshot.rate_x100(),
        clean_drain: result.clean_drain,
    };

    if let Some(path) = args.run_log.as_deref()
        && let Err(err) = sinks::append_run_log(path, &record).await
    {
        warn!("Failed to append run log: {}", err);
    }
    if let Some(path) = args.export_json.as_deref()
        && let Err(err) = sinks::write_json_summary(path, &record).await
    {
        warn!("Failed to write JSON summary: {}", err);
    }
}
