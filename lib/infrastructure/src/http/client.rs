use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;

/// Builds outgoing HTTP clients with request tracing attached.
///
/// The `authorization` value is sent verbatim, so callers pick the scheme
/// (`Bearer ...`, a raw API token, ...).
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    authorization: Option<String>,
    timeout: Option<Duration>,
}

impl HttpClientConfig {
    pub fn new(authorization: Option<String>) -> Self {
        Self {
            authorization,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn new_tracing_client(&self) -> anyhow::Result<ClientWithMiddleware> {
        let mut headers = HeaderMap::new();

        if let Some(authorization) = &self.authorization {
            let mut auth_value =
                HeaderValue::from_str(authorization).context("Authorization value is not a valid header")?;
            auth_value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth_value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().context("Error building HTTP client")?;

        Ok(reqwest_middleware::ClientBuilder::new(client)
            .with(TracingMiddleware::default())
            .build())
    }
}
