//! Native HTTP client using bitreq.

use std::collections::HashMap;

use crate::HttpError;

use super::{HttpClient, HttpResponse, REQUEST_TIMEOUT};

/// HTTP client implementation using bitreq.
///
/// A fresh single-connection client is built for every request, so no connection outlives the
/// call that opened it.
pub struct BitreqHttpClient {
    user_agent: Option<String>,
    timeout_secs: u64,
}

impl BitreqHttpClient {
    /// Create a new `BitreqHttpClient` with an optional user agent.
    pub fn new(user_agent: Option<String>) -> Self {
        Self {
            user_agent,
            timeout_secs: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout, in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn add_common_headers(&self, req: bitreq::Request) -> bitreq::Request {
        let mut req = req.with_timeout(self.timeout_secs);
        if let Some(ua) = &self.user_agent {
            req = req.with_header("User-Agent", ua);
        }
        req
    }
}

impl Default for BitreqHttpClient {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait::async_trait]
impl HttpClient for BitreqHttpClient {
    async fn get(
        &self,
        url: String,
        headers: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, HttpError> {
        tracing::debug!("Making GET request to: {url}");
        let mut req = self.add_common_headers(bitreq::get(&url));

        if let Some(headers) = headers {
            for (key, value) in &headers {
                req = req.with_header(key, value);
            }
        }

        let client = bitreq::Client::new(1);
        let response = client.send_async(req).await?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let status = response.status_code as u16;
        let body = response.as_str()?.to_string();
        tracing::debug!("Received response, status: {status}");
        tracing::trace!("raw response body: {body}");

        Ok(HttpResponse { status, body })
    }
}
