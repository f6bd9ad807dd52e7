//! Response envelope codec.
//!
//! The panel wraps every resource as `{object, attributes}` and every collection as
//! `{object: "list", data: [...], meta: {pagination}}`. Failures use a separate
//! `{errors: [...]}` shape. Which of the two a body is gets decided by the HTTP status
//! alone, see [`route_response`].

use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, PanelError, PanelErrors, Result};
use crate::pagination::{Page, Pagination};

/// A single resource wrapper: `{object, attributes}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<T> {
    /// Resource kind reported by the panel (e.g. `"server"`)
    #[serde(default)]
    pub object: String,
    /// The resource itself
    pub attributes: T,
}

impl<T> Item<T> {
    /// Wrap `attributes` as a resource of kind `object`.
    pub fn new(object: impl Into<String>, attributes: T) -> Self {
        Self {
            object: object.into(),
            attributes,
        }
    }
}

/// A collection wrapper: `{object: "list", data, meta}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Collection<T> {
    /// Always `"list"` for well-formed panels
    #[serde(default)]
    pub object: String,
    /// Wrapped entities in panel order
    #[serde(default = "Vec::new", deserialize_with = "empty_object_as_vec")]
    pub data: Vec<Item<T>>,
    /// Pagination block, absent on unpaginated lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// The `meta` object of a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Pagination details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Collection<T> {
    /// Unwrap the entities and keep the pagination block.
    #[must_use]
    pub fn into_page(self) -> Page<T> {
        Page {
            items: self.data.into_iter().map(|item| item.attributes).collect(),
            pagination: self.meta.and_then(|meta| meta.pagination),
        }
    }
}

/// A nested relationship collection such as an egg's `variables`.
///
/// Accepts a normal `{object, data}` list, and also `{}`, `[]` or `null` for an empty
/// relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipList<T> {
    /// Resource kind, usually `"list"`
    pub object: String,
    /// Wrapped related entities
    pub data: Vec<Item<T>>,
}

impl<T> Default for RelationshipList<T> {
    fn default() -> Self {
        Self {
            object: "list".to_string(),
            data: Vec::new(),
        }
    }
}

impl<T> RelationshipList<T> {
    /// Borrow the related entities.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter().map(|item| &item.attributes)
    }

    /// Number of related entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when there are no related entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Unwrap the related entities.
    #[must_use]
    pub fn into_attributes(self) -> Vec<T> {
        self.data.into_iter().map(|item| item.attributes).collect()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RelationshipList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(bound = "T: DeserializeOwned")]
        struct Wire<T> {
            #[serde(default)]
            object: Option<String>,
            #[serde(default = "Vec::new", deserialize_with = "empty_object_as_vec")]
            data: Vec<Item<T>>,
        }

        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::default()),
            Value::Array(values) if values.is_empty() => Ok(Self::default()),
            value @ Value::Object(_) => {
                let wire: Wire<T> = serde_json::from_value(value).map_err(D::Error::custom)?;
                Ok(Self {
                    object: wire.object.unwrap_or_else(|| "list".to_string()),
                    data: wire.data,
                })
            }
            other => Err(D::Error::custom(format!(
                "expected a relationship list, found {other}"
            ))),
        }
    }
}

/// Deserialize a sequence, treating `{}` and `null` as empty.
///
/// Some panel versions emit an empty object where an empty array is meant. Use on any
/// sequence-typed field with `#[serde(default, deserialize_with = "empty_object_as_vec")]`.
///
/// # Errors
///
/// Fails when the value is neither a sequence of `T`, `null`, nor an empty object.
pub fn empty_object_as_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        value => serde_json::from_value(value).map_err(D::Error::custom),
    }
}

/// Deserialize a map-like value, treating `[]` and `null` as its default.
///
/// The panel renders an empty associative array as `[]`; use on map- or struct-typed
/// fields with `#[serde(default, deserialize_with = "empty_array_as_default")]`.
///
/// # Errors
///
/// Fails when the value is neither a `T`, `null`, nor an empty array.
pub fn empty_array_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(T::default()),
        Value::Array(values) if values.is_empty() => Ok(T::default()),
        value => serde_json::from_value(value).map_err(D::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    errors: Vec<PanelError>,
}

#[derive(Debug, Deserialize)]
struct DataWrapper<T> {
    data: T,
}

/// Route a raw response by status.
///
/// Returns `Ok(Some(body))` for 200/201/202, `Ok(None)` for 204 and the decoded error for
/// every other status. 5xx bodies are never parsed.
///
/// # Errors
///
/// Returns [`Error::Server`] for 5xx, [`Error::Panel`] when the body is an error envelope
/// and [`Error::UnexpectedStatus`] otherwise.
pub fn route_response(status: StatusCode, body: Bytes) -> Result<Option<Bytes>> {
    match status.as_u16() {
        200 | 201 | 202 => Ok(Some(body)),
        204 => Ok(None),
        code if status.is_server_error() => Err(Error::Server {
            status: code,
            body: String::from_utf8_lossy(&body).into_owned(),
        }),
        code => Err(decode_error(code, &body)),
    }
}

/// Decode a failure body into a structured error.
#[must_use]
pub fn decode_error(status: u16, body: &[u8]) -> Error {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => Error::Panel(PanelErrors::new(envelope.errors)),
        Err(_) => Error::UnexpectedStatus {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        },
    }
}

/// Decode a single-resource body into its `attributes`.
///
/// # Errors
///
/// Returns [`Error::Decode`] when `attributes` is missing or has the wrong shape.
pub fn decode_item<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice::<Item<T>>(body)
        .map(|item| item.attributes)
        .map_err(|err| Error::Decode(format!("invalid resource envelope: {err}")))
}

/// Decode a collection body into one page of entities.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the body is not a collection of `T`.
pub fn decode_collection<T: DeserializeOwned>(body: &[u8]) -> Result<Page<T>> {
    serde_json::from_slice::<Collection<T>>(body)
        .map(Collection::into_page)
        .map_err(|err| Error::Decode(format!("invalid collection envelope: {err}")))
}

/// Decode a `{data: ...}` body, used by a few client endpoints.
///
/// # Errors
///
/// Returns [`Error::Decode`] when `data` is missing or has the wrong shape.
pub fn decode_data<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice::<DataWrapper<T>>(body)
        .map(|wrapper| wrapper.data)
        .map_err(|err| Error::Decode(format!("invalid data envelope: {err}")))
}

/// Decode a body that is not wrapped in any envelope.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the body does not match `T`.
pub fn decode_plain<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|err| Error::Decode(format!("invalid response body: {err}")))
}

/// Require content from a routed response.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the panel answered 204 where a body was expected.
pub fn require_body(body: Option<Bytes>) -> Result<Bytes> {
    body.ok_or_else(|| Error::Decode("expected a response body, got 204 No Content".to_string()))
}
