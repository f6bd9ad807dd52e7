//! Core panel domain types shared by both API scopes.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Media type sent in `Accept` by default.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Versioned media type some panel deployments insist on.
pub const VERSIONED_MEDIA_TYPE: &str = "application/vnd.pterodactyl.v1+json";

/// The two credential scopes of the panel API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiScope {
    /// Administrative API under `/api/application`
    Application,
    /// End-user API under `/api/client`
    Client,
}

impl ApiScope {
    /// Returns the scope name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Client => "client",
        }
    }

    /// Path prefix every endpoint of this scope lives under, with trailing slash.
    #[must_use]
    pub const fn path_prefix(&self) -> &'static str {
        match self {
            Self::Application => "api/application/",
            Self::Client => "api/client/",
        }
    }
}

impl FromStr for ApiScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "application" | "app" => Ok(Self::Application),
            "client" => Ok(Self::Client),
            _ => Err(Error::Config(format!("Unknown API scope: {s}"))),
        }
    }
}

impl std::fmt::Display for ApiScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which `Accept` header to send with API requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceptHeader {
    /// `application/json`
    #[default]
    Json,
    /// `application/vnd.pterodactyl.v1+json`
    Versioned,
}

impl AcceptHeader {
    /// Header value for this variant.
    #[must_use]
    pub const fn media_type(&self) -> &'static str {
        match self {
            Self::Json => JSON_MEDIA_TYPE,
            Self::Versioned => VERSIONED_MEDIA_TYPE,
        }
    }
}

/// A JSON field that may be missing, explicitly `null`, or set.
///
/// Use with `#[serde(default, skip_serializing_if = "Nullable::is_absent")]` so a missing
/// field stays [`Nullable::Absent`] and is not written back out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    /// Field not present in the payload
    Absent,
    /// Field present with a `null` value
    Null,
    /// Field present with a value
    Value(T),
}

impl<T> Nullable<T> {
    /// True when the field was not present.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// True when the field was present and `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the value, if any.
    #[must_use]
    pub const fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Map `None` to an explicit null.
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }

    /// Collapse absent and null into `None`.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from_option)
    }
}

/// Deserialize a flag the panel sends either as a boolean or as `0`/`1`.
///
/// # Errors
///
/// Fails for anything other than a boolean, an integer or `null` (read as `false`).
pub fn bool_or_int<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Ok(flag),
        Value::Number(number) => match number.as_i64() {
            Some(value) => Ok(value != 0),
            None => Err(D::Error::custom(format!("expected an integer flag, found {number}"))),
        },
        Value::Null => Ok(false),
        other => Err(D::Error::custom(format!(
            "expected a boolean or integer flag, found {other}"
        ))),
    }
}

/// System resource limits of a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Memory in MiB
    pub memory: i64,
    /// Swap in MiB (`-1` for unlimited)
    pub swap: i64,
    /// Disk in MiB
    pub disk: i64,
    /// Block IO weight
    pub io: i64,
    /// CPU limit in percent of one core
    pub cpu: i64,
    /// Pinned CPU threads, e.g. `"0-1,3"`
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub threads: Nullable<String>,
    /// Whether the OOM killer is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oom_disabled: Option<bool>,
}

/// Feature limits of a server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLimits {
    /// Maximum number of allocations
    #[serde(default)]
    pub allocations: i64,
    /// Maximum number of backups
    #[serde(default)]
    pub backups: i64,
    /// Maximum number of databases
    #[serde(default)]
    pub databases: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, skip_serializing_if = "Nullable::is_absent")]
        external_id: Nullable<String>,
    }

    #[test]
    fn nullable_distinguishes_absent_null_and_value() {
        let absent: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(absent.external_id.is_absent());

        let null: Holder = serde_json::from_value(json!({ "external_id": null })).unwrap();
        assert!(null.external_id.is_null());

        let value: Holder = serde_json::from_value(json!({ "external_id": "ext-1" })).unwrap();
        assert_eq!(value.external_id.as_value().map(String::as_str), Some("ext-1"));
    }

    #[test]
    fn nullable_rejects_wrong_type() {
        let result = serde_json::from_value::<Holder>(json!({ "external_id": 12 }));
        assert!(result.is_err());
    }

    #[test]
    fn nullable_serialization_skips_absent_and_keeps_null() {
        assert_eq!(serde_json::to_value(Holder::default()).unwrap(), json!({}));
        let holder = Holder {
            external_id: Nullable::Null,
        };
        assert_eq!(
            serde_json::to_value(holder).unwrap(),
            json!({ "external_id": null })
        );
    }

    #[test]
    fn scope_prefix_and_parse() {
        assert_eq!(ApiScope::Application.path_prefix(), "api/application/");
        assert_eq!(ApiScope::Client.path_prefix(), "api/client/");
        assert_eq!("CLIENT".parse::<ApiScope>().unwrap(), ApiScope::Client);
        assert!("admin".parse::<ApiScope>().is_err());
        assert_eq!(ApiScope::Application.to_string(), "application");
    }

    #[test]
    fn accept_header_media_types() {
        assert_eq!(AcceptHeader::default().media_type(), "application/json");
        assert_eq!(
            AcceptHeader::Versioned.media_type(),
            "application/vnd.pterodactyl.v1+json"
        );
    }

    #[test]
    fn limits_accept_null_threads() {
        let limits: Limits = serde_json::from_value(json!({
            "memory": 1024, "swap": 0, "disk": 5120, "io": 500, "cpu": 100,
            "threads": null, "oom_disabled": true
        }))
        .unwrap();
        assert!(limits.threads.is_null());
        assert_eq!(limits.oom_disabled, Some(true));
    }

    #[derive(Debug, Deserialize)]
    struct Flag {
        #[serde(default, deserialize_with = "bool_or_int")]
        installed: bool,
    }

    #[test]
    fn flags_accept_booleans_and_integers() {
        for (raw, expected) in [
            (json!({ "installed": 1 }), true),
            (json!({ "installed": 0 }), false),
            (json!({ "installed": true }), true),
            (json!({ "installed": null }), false),
            (json!({}), false),
        ] {
            let flag: Flag = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(flag.installed, expected, "{raw}");
        }
        assert!(serde_json::from_value::<Flag>(json!({ "installed": "yes" })).is_err());
    }
}
