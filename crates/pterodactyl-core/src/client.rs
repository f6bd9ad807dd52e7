//! HTTP client configuration and the shared panel client.
//!
//! [`PanelClient`] is what every endpoint function goes through: it builds the request,
//! hands it to the [`Transport`], routes the response by status and runs the envelope
//! codec. It holds no mutable state and is cheap to clone.

use bytes::Bytes;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::envelope::{
    decode_collection, decode_data, decode_item, decode_plain, require_body, route_response,
};
use crate::error::Result;
use crate::pagination::{collect_pages, Page};
use crate::query::QueryParams;
use crate::request::{update_body, PanelRequest, RequestBody, RequestFactory};
use crate::transport::Transport;
use crate::types::ApiScope;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("pterodactyl-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,

    /// Verify the panel's TLS certificate
    pub tls_verify: bool,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
            tls_verify: true,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared request/response pipeline for one API scope.
#[derive(Clone)]
pub struct PanelClient {
    transport: Arc<dyn Transport>,
    requests: RequestFactory,
    per_page: Option<u32>,
}

impl std::fmt::Debug for PanelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelClient")
            .field("scope", &self.requests.scope())
            .field("base_url", &self.requests.base_url().as_str())
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

impl PanelClient {
    /// Create a client from a transport and a request factory.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, requests: RequestFactory) -> Self {
        Self {
            transport,
            requests,
            per_page: None,
        }
    }

    /// Ask the panel for `per_page` entities per collection page.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: Option<u32>) -> Self {
        self.per_page = per_page;
        self
    }

    /// The scope requests are issued in.
    #[must_use]
    pub const fn scope(&self) -> ApiScope {
        self.requests.scope()
    }

    /// Base URL of the scope (ends in `/api/<scope>/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.requests.base_url()
    }

    /// The transport requests are sent through.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Build an authenticated request without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`](crate::error::Error::InvalidEndpoint) if the path cannot be resolved.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: RequestBody,
    ) -> Result<PanelRequest> {
        self.requests.build(method, path, query, body)
    }

    /// Send a request and route the response by status.
    ///
    /// Returns `None` for `204 No Content`.
    ///
    /// # Errors
    ///
    /// Transport errors propagate unchanged; non-success statuses become
    /// [`Error::Panel`](crate::error::Error::Panel), [`Error::Server`](crate::error::Error::Server) or [`Error::UnexpectedStatus`](crate::error::Error::UnexpectedStatus).
    pub async fn send(&self, request: PanelRequest) -> Result<Option<Bytes>> {
        debug!(
            scope = %self.scope(),
            method = %request.method,
            path = request.url.path(),
            "panel request"
        );

        let response = self.transport.execute(request).await?;
        route_response(response.status, response.body)
    }

    /// GET a single resource.
    ///
    /// # Errors
    ///
    /// See [`PanelClient::send`]; also [`Error::Decode`](crate::error::Error::Decode) for a malformed body.
    pub async fn get_item<T>(&self, path: &str, query: &[(&'static str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path, query, RequestBody::Empty)?;
        let body = require_body(self.send(request).await?)?;
        decode_item(&body)
    }

    /// GET one page of a collection.
    ///
    /// # Errors
    ///
    /// See [`PanelClient::send`]; also [`Error::Decode`](crate::error::Error::Decode) for a malformed body.
    pub async fn get_page<T>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        page: u32,
    ) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        let mut params = QueryParams::from(query);
        params.set("page", page);
        if let Some(per_page) = self.per_page {
            params.set("per_page", per_page);
        }

        let request = self.request(Method::GET, path, params.as_pairs(), RequestBody::Empty)?;
        let body = require_body(self.send(request).await?)?;
        decode_collection(&body)
    }

    /// GET every page of a collection, in order.
    ///
    /// # Errors
    ///
    /// Returns the first page error; no partial result is returned.
    pub async fn get_all<T>(&self, path: &str, query: &[(&'static str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        collect_pages(|page| self.get_page(path, query, page)).await
    }

    /// GET an unpaginated collection.
    ///
    /// # Errors
    ///
    /// See [`PanelClient::send`]; also [`Error::Decode`](crate::error::Error::Decode) for a malformed body.
    pub async fn get_list<T>(&self, path: &str, query: &[(&'static str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path, query, RequestBody::Empty)?;
        let body = require_body(self.send(request).await?)?;
        decode_collection(&body).map(|page| page.items)
    }

    /// GET a `{data: ...}` document.
    ///
    /// # Errors
    ///
    /// See [`PanelClient::send`]; also [`Error::Decode`](crate::error::Error::Decode) for a malformed body.
    pub async fn get_data<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path, &[], RequestBody::Empty)?;
        let body = require_body(self.send(request).await?)?;
        decode_data(&body)
    }

    /// GET a document that is not wrapped in any envelope.
    ///
    /// # Errors
    ///
    /// See [`PanelClient::send`]; also [`Error::Decode`](crate::error::Error::Decode) for a malformed body.
    pub async fn get_plain<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path, &[], RequestBody::Empty)?;
        let body = require_body(self.send(request).await?)?;
        decode_plain(&body)
    }

    /// GET a raw body with a custom `Accept` header.
    ///
    /// # Errors
    ///
    /// See [`PanelClient::send`]. A 204 yields an empty body.
    pub async fn get_bytes(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        accept: &'static str,
    ) -> Result<Bytes> {
        let request = self
            .request(Method::GET, path, query, RequestBody::Empty)?
            .with_header(ACCEPT, HeaderValue::from_static(accept));
        Ok(self.send(request).await?.unwrap_or_default())
    }

    /// Send a JSON body and decode the returned single resource.
    ///
    /// # Errors
    ///
    /// See [`PanelClient::send`]; also [`Error::Decode`](crate::error::Error::Decode) for a malformed or missing body.
    pub async fn send_item<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path, &[], RequestBody::json(body)?)?;
        let body = require_body(self.send(request).await?)?;
        decode_item(&body)
    }

    /// Send a JSON body and decode a `{data: ...}` or plain response via `decode`.
    ///
    /// # Errors
    ///
    /// See [`PanelClient::send`]; also [`Error::Decode`](crate::error::Error::Decode) for a malformed or missing body.
    pub async fn send_with<B, T, F>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        decode: F,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        F: FnOnce(&[u8]) -> Result<T>,
    {
        let payload = match body {
            Some(body) => RequestBody::json(body)?,
            None => RequestBody::Empty,
        };
        let request = self.request(method, path, &[], payload)?;
        let body = require_body(self.send(request).await?)?;
        decode(&body)
    }

    /// Send an update descriptor and decode the returned resource.
    ///
    /// A descriptor serializing to `{}` is rejected before anything is sent; `kind` names
    /// it in the error (`"no <kind> fields specified"`).
    ///
    /// # Errors
    ///
    /// [`Error::Validation`](crate::error::Error::Validation) for an empty descriptor, otherwise as
    /// [`PanelClient::send_item`].
    pub async fn update_item<B, T>(
        &self,
        method: Method,
        path: &str,
        descriptor: &B,
        kind: &str,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = update_body(descriptor, kind)?;
        let request = self.request(method, path, &[], body)?;
        let body = require_body(self.send(request).await?)?;
        decode_item(&body)
    }

    /// Send a request whose response body is not needed.
    ///
    /// Any success status is accepted, with or without a body.
    ///
    /// # Errors
    ///
    /// See [`PanelClient::send`].
    pub async fn send_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let payload = match body {
            Some(body) => RequestBody::json(body)?,
            None => RequestBody::Empty,
        };
        let request = self.request(method, path, &[], payload)?;
        self.send(request).await.map(|_| ())
    }

    /// Send a raw body (e.g. file contents) whose response body is not needed.
    ///
    /// # Errors
    ///
    /// See [`PanelClient::send`].
    pub async fn send_raw(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        content_type: &str,
        data: Bytes,
    ) -> Result<()> {
        let body = RequestBody::Bytes {
            content_type: content_type.to_string(),
            data,
        };
        let request = self.request(method, path, query, body)?;
        self.send(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::{MockTransport, PanelResponse};
    use crate::types::AcceptHeader;
    use mockall::Sequence;
    use reqwest::StatusCode;
    use secrecy::SecretString;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Location {
        id: u64,
        short: String,
    }

    #[derive(Debug, Default, Serialize)]
    struct UpdateLocation {
        #[serde(skip_serializing_if = "Option::is_none")]
        short: Option<String>,
    }

    fn client(transport: MockTransport) -> PanelClient {
        let requests = RequestFactory::new(
            "https://panel.example.com",
            ApiScope::Application,
            &SecretString::from("ptla_test".to_string()),
            AcceptHeader::Json,
        )
        .unwrap();
        PanelClient::new(Arc::new(transport), requests)
    }

    fn json_response(status: u16, value: serde_json::Value) -> Result<PanelResponse> {
        Ok(PanelResponse::new(
            StatusCode::from_u16(status).unwrap(),
            serde_json::to_vec(&value).unwrap(),
        ))
    }

    fn page_of(ids: &[u64], page: u32, total_pages: u32) -> serde_json::Value {
        let data: Vec<_> = ids
            .iter()
            .map(|id| json!({ "object": "location", "attributes": { "id": id, "short": format!("l{id}") } }))
            .collect();
        json!({
            "object": "list",
            "data": data,
            "meta": { "pagination": {
                "total": 0, "count": ids.len(), "per_page": 2,
                "current_page": page, "total_pages": total_pages, "links": {}
            } }
        })
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::new();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT));
        assert_eq!(config.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE_PER_HOST);
        assert!(config.tls_verify);
        assert!(config.user_agent.starts_with("pterodactyl-rust/"));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_pool_max_idle(2)
            .with_compression(false)
            .with_tls_verify(false)
            .with_user_agent("panel-sync/1.0");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.pool_max_idle_per_host, 2);
        assert!(!config.enable_compression);
        assert!(!config.tls_verify);
        assert_eq!(config.user_agent, "panel-sync/1.0");
    }

    #[tokio::test]
    async fn get_item_decodes_attributes() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|r| r.method == Method::GET && r.url.path() == "/api/application/locations/1")
            .times(1)
            .returning(|_| {
                json_response(200, json!({ "object": "location", "attributes": { "id": 1, "short": "us" } }))
            });

        let location: Location = client(transport).get_item("locations/1", &[]).await.unwrap();
        assert_eq!(location, Location { id: 1, short: "us".into() });
    }

    #[tokio::test]
    async fn get_item_rejects_no_content() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Ok(PanelResponse::new(StatusCode::NO_CONTENT, Bytes::new())));

        let err = client(transport)
            .get_item::<Location>("locations/1", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn get_all_requests_pages_in_order() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        for (page, ids) in [(1u32, vec![1u64, 2]), (2, vec![3, 4]), (3, vec![5])] {
            transport
                .expect_execute()
                .withf(move |r| {
                    r.url
                        .query_pairs()
                        .any(|(k, v)| k == "page" && v == page.to_string().as_str())
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| json_response(200, page_of(&ids, page, 3)));
        }

        let items: Vec<Location> = client(transport).get_all("locations", &[]).await.unwrap();
        let ids: Vec<u64> = items.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn get_all_sends_per_page_hint() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|r| r.url.query() == Some("page=1&per_page=100"))
            .times(1)
            .returning(|_| json_response(200, page_of(&[1], 1, 1)));

        let items: Vec<Location> = client(transport)
            .with_per_page(Some(100))
            .get_all("locations", &[])
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn empty_update_sends_nothing() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(0);

        let err = client(transport)
            .update_item::<_, Location>(Method::PATCH, "locations/1", &UpdateLocation::default(), "update")
            .await
            .unwrap_err();
        assert_eq!(err, Error::Validation("no update fields specified".to_string()));
    }

    #[tokio::test]
    async fn update_sends_descriptor() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|r| {
                r.method == Method::PATCH
                    && r.body == RequestBody::Json(json!({ "short": "eu" }))
            })
            .times(1)
            .returning(|_| {
                json_response(200, json!({ "object": "location", "attributes": { "id": 1, "short": "eu" } }))
            });

        let descriptor = UpdateLocation {
            short: Some("eu".into()),
        };
        let location: Location = client(transport)
            .update_item(Method::PATCH, "locations/1", &descriptor, "update")
            .await
            .unwrap();
        assert_eq!(location.short, "eu");
    }

    #[tokio::test]
    async fn send_empty_accepts_no_content() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|r| r.method == Method::DELETE)
            .times(1)
            .returning(|_| Ok(PanelResponse::new(StatusCode::NO_CONTENT, Bytes::new())));

        client(transport)
            .send_empty::<()>(Method::DELETE, "locations/1", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn transport_errors_propagate_unchanged() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Err(Error::Timeout("operation timed out".into())));

        let err = client(transport)
            .get_item::<Location>("locations/1", &[])
            .await
            .unwrap_err();
        assert_eq!(err, Error::Timeout("operation timed out".into()));
    }

    #[tokio::test]
    async fn get_bytes_overrides_accept() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|r| r.header("accept") == Some("application/json,text/plain"))
            .times(1)
            .returning(|_| Ok(PanelResponse::new(StatusCode::OK, "motd=hello")));

        let body = client(transport)
            .get_bytes("files/contents", &[], "application/json,text/plain")
            .await
            .unwrap();
        assert_eq!(body, Bytes::from_static(b"motd=hello"));
    }
}
