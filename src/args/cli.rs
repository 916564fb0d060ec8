use clap::Parser;
use std::time::Duration;

use super::parsers::{
    parse_concurrency, parse_duration_arg, parse_form_field, parse_header, parse_run_duration,
};
use super::types::{Concurrency, DurationSecs, HttpMethod};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Self-refilling concurrent HTTP load generator - fixed-concurrency worker pool, live aggregate counters, and append-only run logs for endpoint soak testing."
)]
pub struct LoadArgs {
    /// Target URL for the load run
    #[arg(long, short)]
    pub url: String,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long, short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Form fields in 'key=value' format, sent urlencoded (repeatable)
    #[arg(long = "form", short = 'F', value_parser = parse_form_field)]
    pub form: Vec<(String, String)>,

    /// Number of concurrent worker slots (1-500)
    #[arg(
        long,
        short = 'c',
        default_value = "50",
        value_parser = parse_concurrency
    )]
    pub concurrency: Concurrency,

    /// Duration of the run in seconds (1-600)
    #[arg(
        long = "duration",
        short = 't',
        default_value = "30",
        value_parser = parse_run_duration
    )]
    pub duration: DurationSecs,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "5s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "3s",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Maximum redirects to follow (0 disables redirect following)
    #[arg(long = "redirect-limit", default_value = "10")]
    pub redirect_limit: u32,

    /// Count only responses matching --status as successes
    /// (default: any status below 400 is a success)
    #[arg(long)]
    pub strict: bool,

    /// Expected HTTP status code for --strict classification
    #[arg(long = "status", short = 's', default_value = "200", requires = "strict")]
    pub expected_status_code: u16,

    /// Interval between live status refreshes (supports ms/s/m/h)
    #[arg(
        long = "sample-interval",
        default_value = "500ms",
        value_parser = parse_duration_arg
    )]
    pub sample_interval: Duration,

    /// How long to wait for in-flight requests once the run ends
    #[arg(
        long = "drain-timeout",
        default_value = "3s",
        value_parser = parse_duration_arg
    )]
    pub drain_timeout: Duration,

    /// Append a one-line record for this run to the given file
    #[arg(long = "run-log", env = "PUMMEL_RUN_LOG")]
    pub run_log: Option<String>,

    /// Write the final summary as JSON to the given file
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Disable the live status line
    #[arg(long = "no-live")]
    pub no_live: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Enable verbose logging (debug level unless overridden by PUMMEL_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
