//! Counter aggregation shared by worker slots and the run controller.
mod aggregate;
mod types;


pub use aggregate::Aggregate;
pub use types::{RequestOutcome, RunResult, Snapshot};
