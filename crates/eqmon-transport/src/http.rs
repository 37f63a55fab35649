//! HTTP poll source.

use crate::error::{TransportError, TransportResult};
use crate::handler::BoxFuture;
use crate::poller::PollSource;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// GET endpoint returning the raw response body.
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    /// Create a source for `url`.
    ///
    /// Without `timeout` the request relies on the client's defaults.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> TransportResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get(&self) -> TransportResult<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| TransportError::Http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Http(format!("Failed to read body: {e}")))?;
        debug!(url = %self.url, bytes = body.len(), "Poll response received");
        Ok(body)
    }
}

impl PollSource for HttpSource {
    fn fetch(&self) -> BoxFuture<'_, TransportResult<String>> {
        Box::pin(self.get())
    }

    fn name(&self) -> &str {
        &self.url
    }
}
