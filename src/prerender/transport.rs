//! Outbound HTTP transport to the rendering service.
//!
//! # Responsibilities
//! - Execute one GET per forwarded request
//! - Buffer the response into a [`RenderedResponse`]
//! - Map client failures onto [`TransportError`]
//!
//! # Design Decisions
//! - Trait seam so hosts and tests can inject their own client
//! - Timeouts, proxy and TLS live in the client; the pipeline never retries
//! - The default client is built once per pipeline and pooled internally

use std::time::Duration;

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::prerender::error::TransportError;
use crate::prerender::outbound::OutboundRequest;
use crate::prerender::response::RenderedResponse;

/// Executes render requests.
#[async_trait]
pub trait RenderTransport: Send + Sync {
    async fn fetch(&self, request: &OutboundRequest) -> Result<RenderedResponse, TransportError>;
}

/// Default transport backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client from the configured options.
    pub fn new(options: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(options.connect_timeout_secs))
            .timeout(Duration::from_secs(options.timeout_secs))
            .danger_accept_invalid_certs(options.accept_invalid_certs);

        // Only an explicitly configured proxy is used; environment proxies are ignored.
        builder = match &options.proxy {
            Some(proxy) => builder.proxy(
                reqwest::Proxy::all(proxy.as_str())
                    .map_err(|e| TransportError::Build(e.to_string()))?,
            ),
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RenderTransport for ReqwestTransport {
    async fn fetch(&self, request: &OutboundRequest) -> Result<RenderedResponse, TransportError> {
        let response = self
            .client
            .request(request.method.clone(), request.url.as_str())
            .headers(request.headers.clone())
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RenderedResponse::new(status, headers, body))
    }
}
