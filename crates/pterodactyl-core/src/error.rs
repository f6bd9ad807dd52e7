//! Error types for panel operations.
//!
//! Every fallible call in the workspace returns [`Error`]. Panel-reported failures keep
//! their full structure in [`PanelErrors`] so callers can inspect each `code`, `status`,
//! `detail` and `source.field` instead of parsing a flattened message.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use thiserror::Error;

/// Main error type for panel operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid client setup (bad panel URL, missing token, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The transport gave up waiting for the panel
    #[error("Timeout waiting for panel: {0}")]
    Timeout(String),

    /// The transport could not reach the panel
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other transport-level failure
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Structured errors reported by the panel
    #[error("Panel error: {0}")]
    Panel(PanelErrors),

    /// The panel answered with a 5xx status
    #[error("Panel server error {status}: {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Non-success status whose body is not an error envelope
    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A success body did not match the expected shape
    #[error("Failed to decode panel response: {0}")]
    Decode(String),

    /// Local pre-flight rejection; nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// A request path could not be resolved against the panel URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Local filesystem failure during a file transfer
    #[error("I/O error: {0}")]
    Io(String),
}

/// Specialized result type for panel operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Connect(_) => "CONNECT_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Panel(_) => "PANEL_ERROR",
            Self::Server { .. } => "SERVER_ERROR",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Structured panel errors, when the panel reported any.
    #[must_use]
    pub fn panel_errors(&self) -> Option<&PanelErrors> {
        match self {
            Self::Panel(errors) => Some(errors),
            _ => None,
        }
    }

    /// HTTP status associated with the failure, when one is known.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Panel(errors) => errors.first().and_then(|e| e.status.parse().ok()),
            _ => None,
        }
    }

    /// Returns true for failures that happened before reaching the panel.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connect(_) | Self::Transport(_))
    }
}

/// One entry of the panel's `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelError {
    /// Machine readable error code (e.g. `ValidationException`)
    pub code: String,
    /// HTTP status as reported in the body
    pub status: String,
    /// Human readable message
    pub detail: String,
    /// Offending request field, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    /// Free-form extra data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl PanelError {
    /// Field named in `source.field`, if present.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.field.as_str())
    }
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.status, self.code, self.detail)
    }
}

/// The `source` object of a panel error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    /// Request field the error refers to
    #[serde(default)]
    pub field: String,
}

/// Ordered list of errors from one error envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelErrors(Vec<PanelError>);

impl PanelErrors {
    /// Wrap an ordered list of panel errors.
    #[must_use]
    pub fn new(errors: Vec<PanelError>) -> Self {
        Self(errors)
    }

    /// Consume into the underlying list.
    #[must_use]
    pub fn into_inner(self) -> Vec<PanelError> {
        self.0
    }
}

impl Deref for PanelErrors {
    type Target = [PanelError];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for PanelErrors {
    type Item = PanelError;
    type IntoIter = std::vec::IntoIter<PanelError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PanelErrors {
    type Item = &'a PanelError;
    type IntoIter = std::slice::Iter<'a, PanelError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PanelErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("0 unexpected error(s)");
        }
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl From<PanelErrors> for Error {
    fn from(errors: PanelErrors) -> Self {
        Self::Panel(errors)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(code: &str, status: &str, detail: &str) -> PanelError {
        PanelError {
            code: code.to_string(),
            status: status.to_string(),
            detail: detail.to_string(),
            source: None,
            meta: None,
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::Config("x".into()).error_code(), "CONFIG_ERROR");
        assert_eq!(Error::Timeout("x".into()).error_code(), "TIMEOUT");
        assert_eq!(Error::Connect("x".into()).error_code(), "CONNECT_ERROR");
        assert_eq!(Error::Transport("x".into()).error_code(), "TRANSPORT_ERROR");
        assert_eq!(
            Error::Panel(PanelErrors::default()).error_code(),
            "PANEL_ERROR"
        );
        assert_eq!(
            Error::Server {
                status: 500,
                body: String::new()
            }
            .error_code(),
            "SERVER_ERROR"
        );
        assert_eq!(Error::Decode("x".into()).error_code(), "DECODE_ERROR");
        assert_eq!(
            Error::Validation("x".into()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(Error::Io("x".into()).error_code(), "IO_ERROR");
    }

    #[test]
    fn panel_errors_display_joins_in_order() {
        let errors = PanelErrors::new(vec![
            sample("ValidationException", "422", "The name field is required."),
            sample("ValidationException", "422", "The email must be valid."),
        ]);
        assert_eq!(
            errors.to_string(),
            "422 (ValidationException): The name field is required.; \
             422 (ValidationException): The email must be valid."
        );
    }

    #[test]
    fn empty_panel_errors_display() {
        assert_eq!(PanelErrors::default().to_string(), "0 unexpected error(s)");
    }

    #[test]
    fn panel_error_keeps_source_and_meta() {
        let error: PanelError = serde_json::from_value(json!({
            "code": "ValidationException",
            "status": "422",
            "detail": "The short field is required.",
            "source": { "field": "short" },
            "meta": { "rule": "required" }
        }))
        .unwrap();

        assert_eq!(error.field(), Some("short"));
        assert_eq!(error.meta, Some(json!({ "rule": "required" })));
    }

    #[test]
    fn status_reads_first_panel_error() {
        let err = Error::Panel(PanelErrors::new(vec![sample("NotFound", "404", "gone")]));
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.panel_errors().map(|e| e.len()), Some(1));

        let err = Error::Server {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.status(), Some(502));
        assert!(err.panel_errors().is_none());
    }

    #[test]
    fn test_is_transport() {
        assert!(Error::Timeout("t".into()).is_transport());
        assert!(Error::Connect("c".into()).is_transport());
        assert!(!Error::Decode("d".into()).is_transport());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let panel_err: Error = err.into();
        assert!(matches!(panel_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let panel_err: Error = err.into();
        assert!(matches!(panel_err, Error::Decode(_)));
    }

    #[test]
    fn test_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let panel_err: Error = err.into();
        assert_eq!(panel_err, Error::Io("missing".to_string()));
    }
}
