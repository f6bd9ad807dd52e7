//! Strongly-typed identifiers for panel resources.
//!
//! Application-scope resources are addressed by integer ids, client-scope servers by a
//! short string identifier. Each gets its own wrapper so the two id spaces of a server
//! (and ids of unrelated resources) cannot be mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate integer id wrapper types.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw id.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw id.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| Error::Validation(format!("invalid {}: {s}", stringify!($name))))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Macro to generate string id wrapper types.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                if s.is_empty() || s.contains('/') {
                    return Err(Error::Validation(format!(
                        "invalid {}: {s:?}",
                        stringify!($name)
                    )));
                }
                Ok(Self(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

numeric_id!(LocationId, "Location id (application scope)");
numeric_id!(NodeId, "Node id (application scope)");
numeric_id!(AllocationId, "Allocation id (application scope)");
numeric_id!(ServerId, "Server id (application scope)");
numeric_id!(UserId, "User id (application scope)");
numeric_id!(NestId, "Nest id (application scope)");
numeric_id!(EggId, "Egg id (application scope)");
numeric_id!(EggVariableId, "Egg variable id (application scope)");

string_id!(ServerIdentifier, "Short server identifier used by the client API");
string_id!(DatabaseId, "Server database id used by the client API");
string_id!(ApiKeyIdentifier, "Public identifier of an account API key");
