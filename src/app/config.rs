use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

use crate::args::{HttpMethod, LoadArgs, SuccessRule};
use crate::error::{AppError, AppResult, ValidationError};

/// Immutable description of one run. Range bounds (concurrency 1-500,
/// duration 1-600s) are enforced while parsing the CLI arguments; a
/// constructed config is trusted by the engine and read-only until `Done`.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: Url,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub concurrency: usize,
    pub duration: Duration,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub redirect_limit: u32,
    pub success_rule: SuccessRule,
    pub sample_interval: Duration,
    pub drain_timeout: Duration,
}

impl RunConfig {
    /// Validates the CLI arguments into a run description.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the target URL does not parse or is
    /// not http(s), or when a header name or value is malformed. All of
    /// these surface before a run starts; nothing is silently clamped.
    pub fn from_args(args: &LoadArgs) -> AppResult<Self> {
        let target = Url::parse(&args.url).map_err(|err| {
            AppError::validation(ValidationError::InvalidTargetUrl {
                url: args.url.clone(),
                source: err,
            })
        })?;
        if target.scheme() != "http" && target.scheme() != "https" {
            return Err(AppError::validation(ValidationError::UnsupportedScheme {
                url: args.url.clone(),
            }));
        }

        for (name, value) in &args.headers {
            if let Err(err) = HeaderName::from_bytes(name.as_bytes()) {
                return Err(AppError::validation(ValidationError::InvalidHeaderName {
                    header: name.clone(),
                    source: err,
                }));
            }
            if let Err(err) = HeaderValue::from_str(value) {
                return Err(AppError::validation(ValidationError::InvalidHeaderValue {
                    header: name.clone(),
                    source: err,
                }));
            }
        }

        let success_rule = if args.strict {
            SuccessRule::Exact(args.expected_status_code)
        } else {
            SuccessRule::Under400
        };

        Ok(Self {
            target,
            method: args.method,
            headers: args.headers.clone(),
            form: args.form.clone(),
            concurrency: usize::try_from(args.concurrency.get()).unwrap_or(usize::MAX),
            duration: Duration::from_secs(args.duration.get()),
            request_timeout: args.request_timeout,
            connect_timeout: args.connect_timeout,
            redirect_limit: args.redirect_limit,
            success_rule,
            sample_interval: args.sample_interval,
            drain_timeout: args.drain_timeout,
        })
    }
}
