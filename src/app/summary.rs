use crate::metrics::RunResult;
use crate::sinks::format_x100;

use super::RunConfig;

/// Milliseconds per second.
const MS_PER_SEC: u128 = 1_000;

/// Final report block printed to stdout once the controller reaches `Done`.
pub fn print_summary(config: &RunConfig, result: &RunResult) {
    for line in summary_lines(config, result) {
        println!("{}", line);
    }
}

pub(super) fn summary_lines(config: &RunConfig, result: &RunResult) -> Vec<String> {
    let snapshot = result.snapshot;
    let wall_ms = result.wall_clock.as_millis();
    let wall_secs = wall_ms.checked_div(MS_PER_SEC).unwrap_or(0);
    let wall_frac = wall_ms.checked_rem(MS_PER_SEC).unwrap_or(0);

    let mut lines = Vec::new();
    lines.push(format!("Target: {}", config.target));
    lines.push(format!(
        "Duration: {}.{:03}s (configured {}s)",
        wall_secs,
        wall_frac,
        config.duration.as_secs()
    ));
    lines.push(format!("Concurrency: {}", config.concurrency));
    lines.push(format!("Total Requests: {}", snapshot.total));
    lines.push(format!(
        "Successful: {} ({}%)",
        snapshot.success,
        format_x100(snapshot.success_rate_x100())
    ));
    lines.push(format!("Failed: {}", snapshot.failed));
    lines.push(format!(
        "Average RPS: {}",
        format_x100(snapshot.rate_x100())
    ));
    if !result.clean_drain {
        lines.push(
            "Note: drain timeout expired; abandoned in-flight requests were not counted."
                .to_owned(),
        );
    }
    lines
}
