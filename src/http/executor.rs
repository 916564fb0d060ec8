use reqwest::{Client, RequestBuilder};
use tracing::{debug, error};
use url::Url;

use crate::args::{HttpMethod, SuccessRule};
use crate::metrics::RequestOutcome;

/// Status reported when no HTTP response was obtained at all.
const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Immutable description of the request every slot repeats. Header names
/// and values are validated while the run config is built, so building a
/// request from this spec does not fail in practice.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    /// Form fields sent urlencoded in the body (the probing-style POST
    /// variant); empty for plain requests.
    pub form: Vec<(String, String)>,
}

impl RequestSpec {
    pub(crate) fn to_builder(&self, client: &Client) -> RequestBuilder {
        let mut builder = match self.method {
            HttpMethod::Get => client.get(self.url.clone()),
            HttpMethod::Post => client.post(self.url.clone()),
            HttpMethod::Patch => client.patch(self.url.clone()),
            HttpMethod::Put => client.put(self.url.clone()),
            HttpMethod::Delete => client.delete(self.url.clone()),
        };

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        if self.form.is_empty() {
            builder
        } else {
            builder.form(&self.form)
        }
    }
}

/// Issues one request and classifies the outcome.
///
/// Transport failures (DNS, refused connection, TLS, timeout, a body that
/// cannot be read) are data, not errors: they come back as
/// `{success: false, status: 0}` and never abort the calling slot. The
/// executor never retries; resubmission is the pool's decision.
pub async fn execute(
    client: &Client,
    spec: &RequestSpec,
    worker: usize,
    rule: SuccessRule,
) -> RequestOutcome {
    let request = match spec.to_builder(client).build() {
        Ok(request) => request,
        Err(err) => {
            error!("Failed to build request: {}", err);
            return RequestOutcome {
                success: false,
                status: TRANSPORT_FAILURE_STATUS,
                worker,
            };
        }
    };

    match client.execute(request).await {
        Ok(response) => {
            let status = response.status().as_u16();
            // Drain the body so keep-alive connections can be reused.
            if let Err(err) = response.bytes().await {
                debug!("Failed to read response body: {}", err);
                return RequestOutcome {
                    success: false,
                    status: TRANSPORT_FAILURE_STATUS,
                    worker,
                };
            }
            RequestOutcome {
                success: rule.accepts(status),
                status,
                worker,
            }
        }
        Err(err) => {
            debug!("Request failed: {}", err);
            RequestOutcome {
                success: false,
                status: TRANSPORT_FAILURE_STATUS,
                worker,
            }
        }
    }
}
