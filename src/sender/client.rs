use super::transport::{HttpResponse, Transport, TransportError};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub connection_timeout: Duration,
    pub max_idle_connections: usize,
    pub keep_alive_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            max_idle_connections: 10,
            keep_alive_timeout: Duration::from_secs(60),
            user_agent: format!("gamp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// [`Transport`] backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connection_timeout)
            .pool_max_idle_per_host(config.max_idle_connections)
            .pool_idle_timeout(config.keep_alive_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                TransportError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    async fn read_response(response: Response) -> HttpResponse {
        let status = response.status().as_u16();
        // An unreadable body still leaves a usable status.
        let body = response.text().await.unwrap_or_default();
        HttpResponse { status, body }
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        debug!("GET {}", url);

        let response = timeout(self.config.timeout, self.client.get(url).send())
            .await
            .map_err(|_| TransportError::Timeout(format!("GET {url}")))??;

        Ok(Self::read_response(response).await)
    }

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<HttpResponse, TransportError> {
        debug!("POST {} ({} bytes)", url, body.len());

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body);

        let response = timeout(self.config.timeout, request.send())
            .await
            .map_err(|_| TransportError::Timeout(format!("POST {url}")))??;

        Ok(Self::read_response(response).await)
    }
}
