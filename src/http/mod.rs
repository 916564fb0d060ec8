//! HTTP client construction and single-request execution.
mod client;
mod executor;


pub use client::build_client;
pub use executor::{RequestSpec, execute};
