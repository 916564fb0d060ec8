use std::time::Duration;

use reqwest::{Client, redirect};

use crate::error::{AppError, AppResult, HttpError};

/// User-Agent advertised on every request.
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("pummel/", env!("CARGO_PKG_VERSION"));

/// Fallback redirect cap when the configured limit does not fit a usize.
const REDIRECT_LIMIT_FALLBACK: usize = 10;

/// Builds the shared HTTP client every worker slot clones.
///
/// # Errors
///
/// Returns an error when the underlying TLS/connector setup fails; this
/// surfaces before any worker is spawned.
pub fn build_client(
    request_timeout: Duration,
    connect_timeout: Duration,
    redirect_limit: u32,
) -> AppResult<Client> {
    let mut builder = Client::builder()
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .user_agent(DEFAULT_USER_AGENT);

    if redirect_limit == 0 {
        builder = builder.redirect(redirect::Policy::none());
    } else {
        builder = builder.redirect(redirect::Policy::limited(
            usize::try_from(redirect_limit).unwrap_or(REDIRECT_LIMIT_FALLBACK),
        ));
    }

    builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
