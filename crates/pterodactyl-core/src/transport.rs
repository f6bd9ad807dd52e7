//! HTTP transport seam.
//!
//! Every request leaves the process through a [`Transport`]. The default implementation
//! wraps a `reqwest` client; tests substitute a mock to observe exactly what was sent.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::warn;

use crate::client::{ClientConfig, DEFAULT_CONNECT_TIMEOUT};
use crate::error::{Error, Result};
use crate::request::{PanelRequest, RequestBody};

/// Raw response as seen by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Full response body
    pub body: Bytes,
}

impl PanelResponse {
    /// Build a response from a status and body.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Executes one request and returns the raw response.
///
/// Implementations must not retry or reinterpret failures; transport errors are
/// reported as [`Error::Timeout`], [`Error::Connect`] or [`Error::Transport`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the whole response body.
    async fn execute(&self, request: PanelRequest) -> Result<PanelResponse>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Build a transport from HTTP tuning options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT));

        if !config.enable_compression {
            builder = builder.no_gzip();
        }

        if !config.tls_verify {
            warn!("TLS certificate verification is disabled for panel requests");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|err| Error::Config(format!("Failed to build panel HTTP client: {err}")))?;

        Ok(Self { http })
    }

    /// Wrap an already configured `reqwest` client.
    #[must_use]
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: PanelRequest) -> Result<PanelResponse> {
        let PanelRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.http.request(method, url).headers(headers);

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Bytes { data, .. } => builder.body(data),
            RequestBody::Multipart {
                field,
                file_name,
                data,
            } => {
                let part = Part::bytes(data.to_vec()).file_name(file_name);
                builder.multipart(Form::new().part(field, part))
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok(PanelResponse { status, body })
    }
}
