mod app;
mod args;
mod entry;
mod error;
mod http;
mod logger;
mod metrics;
mod pool;
mod shutdown;
mod sinks;
mod ui;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
