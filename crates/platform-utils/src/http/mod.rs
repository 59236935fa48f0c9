//! HTTP client abstraction used to fetch LNURL endpoints.

use std::collections::HashMap;

use crate::HttpError;

mod native;

pub use native::BitreqHttpClient;

/// Default HTTP client type for the current platform.
pub type DefaultHttpClient = BitreqHttpClient;

/// Default request timeout in seconds.
pub const REQUEST_TIMEOUT: u64 = 30;

/// Response from an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Returns true if the status code indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client trait for making requests.
///
/// Status-code policy is left to the caller: implementations return every response that was
/// received, whatever its status, and only fail when no response could be read.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Makes a GET request.
    async fn get(
        &self,
        url: String,
        headers: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, HttpError>;
}

#[async_trait::async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Box<T> {
    async fn get(
        &self,
        url: String,
        headers: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, HttpError> {
        (**self).get(url, headers).await
    }
}

#[async_trait::async_trait]
impl<T: HttpClient + ?Sized> HttpClient for std::sync::Arc<T> {
    async fn get(
        &self,
        url: String,
        headers: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, HttpError> {
        (**self).get(url, headers).await
    }
}
