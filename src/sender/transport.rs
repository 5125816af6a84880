use bytes::Bytes;
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Request timeout: {0}")]
    Timeout(String),
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),
}

/// Status and body text of a collector response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Only 200 counts as accepted.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// HTTP operations the buffered client needs from its transport.
///
/// Either a response (of any status) or a transport error is returned; a
/// response is always present on success.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;

    fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Bytes,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
