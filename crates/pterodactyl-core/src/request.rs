//! Request construction and authentication.
//!
//! [`RequestFactory`] turns a method, a scope-relative path, query pairs and a body into a
//! fully-formed [`PanelRequest`]. It performs no I/O.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::types::{AcceptHeader, ApiScope, JSON_MEDIA_TYPE};

/// Body of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body
    Empty,
    /// JSON document
    Json(Value),
    /// Raw bytes with an explicit content type
    Bytes {
        /// Value of the `Content-Type` header
        content_type: String,
        /// Payload
        data: Bytes,
    },
    /// `multipart/form-data` with a single file part
    Multipart {
        /// Form field name
        field: String,
        /// File name reported for the part
        file_name: String,
        /// File contents
        data: Bytes,
    },
}

impl RequestBody {
    /// Serialize `value` into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `value` cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(value: &B) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|err| Error::Validation(format!("request body is not valid JSON: {err}")))
    }

    /// True when there is nothing to send.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A fully-formed outbound request, ready for a [`crate::transport::Transport`].
#[derive(Debug, Clone)]
pub struct PanelRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including the query string
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: RequestBody,
}

impl PanelRequest {
    /// A request to a pre-signed URL; carries no `Authorization` header.
    #[must_use]
    pub fn unauthenticated(method: Method, url: Url, body: RequestBody) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// Header value as a string, if present and printable.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// True when a bearer token is attached.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// Replace a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Builds authenticated requests for one API scope.
#[derive(Debug, Clone)]
pub struct RequestFactory {
    base_url: Url,
    scope: ApiScope,
    authorization: HeaderValue,
    accept: HeaderValue,
}

impl RequestFactory {
    /// Create a factory for `scope` on the panel at `panel_url`.
    ///
    /// The panel may be hosted under a sub-path (`https://example.com/panel`); the scope
    /// prefix is appended to whatever path the URL already has.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the URL is malformed, not http(s), or the token is
    /// empty or not a valid header value.
    pub fn new(
        panel_url: &str,
        scope: ApiScope,
        token: &SecretString,
        accept: AcceptHeader,
    ) -> Result<Self> {
        let base_url = scope_base_url(panel_url, scope)?;

        let secret = token.expose_secret();
        if secret.trim().is_empty() {
            return Err(Error::Config(format!("The {scope} API token is empty")));
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {secret}"))
            .map_err(|err| Error::Config(format!("Invalid {scope} API token: {err}")))?;
        authorization.set_sensitive(true);

        Ok(Self {
            base_url,
            scope,
            authorization,
            accept: HeaderValue::from_static(accept.media_type()),
        })
    }

    /// The scope this factory builds requests for.
    #[must_use]
    pub const fn scope(&self) -> ApiScope {
        self.scope
    }

    /// Base URL every path is resolved against (ends in `/api/<scope>/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a scope-relative path and append query pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the path cannot be joined.
    pub fn url(&self, path: &str, query: &[(&'static str, String)]) -> Result<Url> {
        let normalized = path.trim_start_matches('/');

        let mut url = self.base_url.join(normalized).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid {} path `{path}`: {err}", self.scope))
        })?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Build a request with bearer auth and JSON content negotiation headers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the path cannot be joined.
    pub fn build(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: RequestBody,
    ) -> Result<PanelRequest> {
        let url = self.url(path, query)?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(ACCEPT, self.accept.clone());
        match &body {
            RequestBody::Bytes { content_type, .. } => {
                let value = HeaderValue::from_str(content_type)
                    .map_err(|err| Error::Validation(format!("Invalid content type: {err}")))?;
                headers.insert(CONTENT_TYPE, value);
            }
            // the multipart encoder supplies its own boundary
            RequestBody::Multipart { .. } => {}
            RequestBody::Empty | RequestBody::Json(_) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
            }
        }

        Ok(PanelRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

fn scope_base_url(panel_url: &str, scope: ApiScope) -> Result<Url> {
    if panel_url.trim().is_empty() {
        return Err(Error::Config("The panel URL is required".to_string()));
    }

    let mut url = Url::parse(panel_url.trim())
        .map_err(|err| Error::Config(format!("Invalid panel URL `{panel_url}`: {err}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "Invalid panel URL `{panel_url}`: scheme must be http or https"
        )));
    }

    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url.join(scope.path_prefix())
        .map_err(|err| Error::Config(format!("Invalid panel URL `{panel_url}`: {err}")))
}

/// Check that a caller-supplied value can be used as a single path segment.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the value is empty or contains `/`, `?` or `#`.
pub fn path_segment<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.is_empty() || value.contains(['/', '?', '#']) {
        return Err(Error::Validation(format!("invalid {what}: {value:?}")));
    }
    Ok(value)
}

/// Serialize an update descriptor, rejecting one with no fields set.
///
/// `kind` names the descriptor in the error, e.g. `"build"` gives
/// `"no build fields specified"`.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the descriptor serializes to `{}`.
pub fn update_body<B: Serialize + ?Sized>(descriptor: &B, kind: &str) -> Result<RequestBody> {
    let body = RequestBody::json(descriptor)?;
    match &body {
        RequestBody::Json(Value::Object(map)) if map.is_empty() => Err(Error::Validation(
            format!("no {kind} fields specified"),
        )),
        _ => Ok(body),
    }
}
