//! Configuration structures for panel clients.
//!
//! [`PanelConfig`] carries everything needed to reach one panel: its URL, the token for
//! each API scope, and HTTP settings. It can be built in code or deserialized from any
//! serde format; either way it is validated before use.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use url::Url;
use validator::Validate;

use crate::client::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{AcceptHeader, ApiScope};

/// Configuration for a panel client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PanelConfig {
    /// Panel base URL, e.g. `https://panel.example.com`
    #[validate(url)]
    pub panel_url: String,

    /// Token for the application API (`ptla_...`)
    #[serde(default, deserialize_with = "optional_secret")]
    pub application_token: Option<SecretString>,

    /// Token for the client API (`ptlc_...`)
    #[serde(default, deserialize_with = "optional_secret")]
    pub client_token: Option<SecretString>,

    /// `Accept` header variant
    #[serde(default)]
    pub accept: AcceptHeader,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Page size hint for collection requests; the panel default when unset
    #[validate(range(min = 1, max = 500))]
    #[serde(default)]
    pub per_page: Option<u32>,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

fn optional_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl PanelConfig {
    /// Create a configuration for the panel at `panel_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is invalid.
    pub fn new(panel_url: impl Into<String>) -> Result<Self> {
        let config = Self {
            panel_url: panel_url.into(),
            application_token: None,
            client_token: None,
            accept: AcceptHeader::default(),
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            per_page: None,
        };

        config.check()?;
        Ok(config)
    }

    /// Set the application API token.
    #[must_use]
    pub fn with_application_token(mut self, token: impl Into<String>) -> Self {
        self.application_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the client API token.
    #[must_use]
    pub fn with_client_token(mut self, token: impl Into<String>) -> Self {
        self.client_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the `Accept` header variant.
    #[must_use]
    pub const fn with_accept(mut self, accept: AcceptHeader) -> Self {
        self.accept = accept;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the page size hint for collection requests.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Validate field ranges and the panel URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing every invalid field.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::Config(format!("Invalid configuration: {e}")))
    }

    /// Token for `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no token is configured for the scope.
    pub fn token(&self, scope: ApiScope) -> Result<&SecretString> {
        let token = match scope {
            ApiScope::Application => self.application_token.as_ref(),
            ApiScope::Client => self.client_token.as_ref(),
        };
        token.ok_or_else(|| Error::Config(format!("No {scope} API token configured")))
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse the panel URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_panel_url(&self) -> Result<Url> {
        Url::parse(&self.panel_url)
            .map_err(|e| Error::Config(format!("Invalid panel URL: {e}")))
    }

    /// HTTP settings derived from this configuration.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.timeout())
            .with_tls_verify(self.tls_verify)
    }
}
