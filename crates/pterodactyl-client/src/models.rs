//! Client API entities and request descriptors.

use chrono::{DateTime, Utc};
use pterodactyl_core::envelope::{empty_object_as_vec, Item};
use pterodactyl_core::ids::{ApiKeyIdentifier, DatabaseId, ServerId, ServerIdentifier, UserId};
use pterodactyl_core::types::{FeatureLimits, Limits, Nullable};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// MIME type the panel reports for directories.
pub const DIRECTORY_MIME_TYPE: &str = "inode/directory";

/// A server as seen by its owner or a subuser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientServer {
    /// Whether the token's user owns the server.
    #[serde(default)]
    pub server_owner: bool,
    /// Short identifier used in client API paths.
    pub identifier: ServerIdentifier,
    /// Server UUID.
    pub uuid: Uuid,
    /// Application-scope id of the same server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<ServerId>,
    /// Display name.
    pub name: String,
    /// Name of the node the server runs on.
    #[serde(default)]
    pub node: String,
    /// SFTP connection details.
    #[serde(default)]
    pub sftp_details: SftpDetails,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Resource limits.
    pub limits: Limits,
    /// Rendered startup command.
    #[serde(default)]
    pub invocation: String,
    /// Docker image.
    #[serde(default)]
    pub docker_image: String,
    /// Egg features such as `eula` or `java_version`.
    #[serde(default, deserialize_with = "empty_object_as_vec")]
    pub egg_features: Vec<String>,
    /// Feature limits.
    #[serde(default)]
    pub feature_limits: FeatureLimits,
    /// Lifecycle status, `null` when active.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub status: Nullable<String>,
    /// Whether the server is suspended.
    #[serde(default)]
    pub is_suspended: bool,
    /// Whether the server is installing.
    #[serde(default)]
    pub is_installing: bool,
    /// Whether the server is being transferred to another node.
    #[serde(default)]
    pub is_transferring: bool,
}

/// `sftp_details` block of a [`ClientServer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SftpDetails {
    /// Host or IP.
    #[serde(default)]
    pub ip: String,
    /// Port.
    #[serde(default)]
    pub port: u16,
}

/// Credentials for the daemon console websocket.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketAuth {
    /// Websocket URL.
    pub socket: String,
    /// Short-lived JWT sent as the first websocket message.
    pub token: SecretString,
}

/// Live resource usage of a server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Power state (`running`, `offline`, ...).
    #[serde(default, rename = "current_state")]
    pub state: String,
    /// Whether the server is suspended.
    #[serde(default, rename = "is_suspended")]
    pub suspended: bool,
    /// Usage counters.
    #[serde(default)]
    pub resources: Resources,
}

/// Usage counters of [`Stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Resources {
    #[serde(default)]
    pub memory_bytes: i64,
    #[serde(default)]
    pub disk_bytes: i64,
    #[serde(default)]
    pub cpu_absolute: f64,
    #[serde(default)]
    pub network_rx_bytes: i64,
    #[serde(default)]
    pub network_tx_bytes: i64,
    #[serde(default)]
    pub uptime: i64,
}

/// Power action sent to the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSignal {
    /// Start the server
    Start,
    /// Stop the server gracefully
    Stop,
    /// Stop then start
    Restart,
    /// Kill the process
    Kill,
}

impl PowerSignal {
    /// Wire name of the signal.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Kill => "kill",
        }
    }
}

impl fmt::Display for PowerSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A database attached to a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDatabase {
    /// Database id.
    pub id: DatabaseId,
    /// Database name.
    pub name: String,
    /// Login user.
    pub username: String,
    /// Database host.
    pub host: DatabaseHost,
    /// Hosts allowed to connect (`%` for any).
    #[serde(default)]
    pub connections_from: String,
    /// Connection limit, `0` for none.
    #[serde(default)]
    pub max_connections: i64,
    /// Included relationships.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<DatabaseRelationships>,
}

impl ClientDatabase {
    /// Password returned by create and rotate-password calls.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.relationships
            .as_ref()
            .and_then(|r| r.password.as_ref())
            .map(|item| item.attributes.password.as_str())
    }
}

/// `host` block of a [`ClientDatabase`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseHost {
    /// Hostname or IP.
    pub address: String,
    /// Port.
    pub port: u16,
}

/// `relationships` block of a [`ClientDatabase`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseRelationships {
    /// Included password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<Item<DatabasePassword>>,
}

/// Password attributes of a database.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabasePassword {
    /// Plaintext password.
    pub password: String,
}

impl fmt::Debug for DatabasePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DatabasePassword([REDACTED])")
    }
}

/// Body for `POST /servers/{id}/databases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDatabaseDescriptor {
    /// Database name; the panel prefixes it with the server id.
    pub database: String,
    /// Hosts allowed to connect (`%` for any).
    pub remote: String,
}

/// An entry of a server directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Entry name.
    pub name: String,
    /// Symbolic mode, e.g. `-rw-r--r--`.
    #[serde(default)]
    pub mode: String,
    /// Octal mode, e.g. `644`.
    #[serde(default)]
    pub mode_bits: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Whether the entry is a regular file.
    #[serde(default)]
    pub is_file: bool,
    /// Whether the entry is a symlink.
    #[serde(default)]
    pub is_symlink: bool,
    /// Detected MIME type.
    #[serde(default)]
    pub mimetype: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl File {
    /// True when the entry is a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.mimetype == DIRECTORY_MIME_TYPE
    }
}

/// One move of a [`RenameDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameFile {
    /// Current name, relative to the root.
    pub from: String,
    /// New name, relative to the root.
    pub to: String,
}

/// Body for `PUT /servers/{id}/files/rename`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameDescriptor {
    /// Directory the names are relative to.
    pub root: String,
    /// Moves to perform.
    pub files: Vec<RenameFile>,
}

/// Body for `POST /servers/{id}/files/compress`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompressDescriptor {
    /// Directory the names are relative to.
    pub root: String,
    /// Entries to archive.
    pub files: Vec<String>,
}

/// Body for `POST /servers/{id}/files/decompress`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecompressDescriptor {
    /// Directory the archive lives in.
    pub root: String,
    /// Archive name.
    pub file: String,
}

/// Body for `POST /servers/{id}/files/delete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteFilesDescriptor {
    /// Directory the names are relative to.
    pub root: String,
    /// Entries to delete.
    pub files: Vec<String>,
}

/// Body for `POST /servers/{id}/files/create-folder`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateFolderDescriptor {
    /// Parent directory.
    pub root: String,
    /// Folder name.
    pub name: String,
}

/// One entry of a [`ChmodDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChmodFile {
    /// Entry name, relative to the root.
    pub file: String,
    /// Octal mode, e.g. `0o644`.
    pub mode: u32,
}

/// Body for `POST /servers/{id}/files/chmod`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChmodDescriptor {
    /// Directory the names are relative to.
    pub root: String,
    /// Mode changes.
    pub files: Vec<ChmodFile>,
}

/// Body for `POST /servers/{id}/files/pull`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullDescriptor {
    /// Remote URL to fetch.
    pub url: String,
    /// Target directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    /// Target file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Take the file name from `Content-Disposition`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub use_header: bool,
    /// Wait for the download to finish.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub foreground: bool,
}

/// The account a client token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// User id.
    pub id: UserId,
    /// Whether the user is an administrator.
    #[serde(default)]
    pub admin: bool,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Interface language.
    #[serde(default)]
    pub language: String,
}

impl Account {
    /// `"<first> <last>"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An account API key. The secret half is only returned once, on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    /// Public identifier.
    pub identifier: ApiKeyIdentifier,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// IPs allowed to use the key; empty for any.
    #[serde(default, deserialize_with = "empty_object_as_vec")]
    pub allowed_ips: Vec<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last use, `null` when never used.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub last_used_at: Nullable<DateTime<Utc>>,
}

/// Body for `POST /account/api-keys`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateApiKeyDescriptor {
    /// Description.
    pub description: String,
    /// IPs allowed to use the key; empty for any.
    pub allowed_ips: Vec<String>,
}

/// A freshly created API key and its secret.
#[derive(Debug, Clone)]
pub struct CreatedApiKey {
    /// The key.
    pub key: ApiKey,
    /// Full token (`identifier` + secret), only available now.
    pub secret_token: Option<SecretString>,
}
