//! Application API entities and request descriptors.
//!
//! Entities mirror the `attributes` object of each resource. Descriptors are the request
//! bodies for create and update calls; update descriptors skip every unset field so an
//! untouched descriptor serializes to `{}` and is rejected before it is sent.

use chrono::{DateTime, Utc};
use pterodactyl_core::envelope::{empty_array_as_default, empty_object_as_vec, RelationshipList};
use pterodactyl_core::ids::{
    AllocationId, EggId, EggVariableId, LocationId, NestId, NodeId, ServerId, ServerIdentifier,
    UserId,
};
use pterodactyl_core::query::QueryParams;
use pterodactyl_core::types::{bool_or_int, FeatureLimits, Limits, Nullable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// A location nodes are grouped under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Location id.
    pub id: LocationId,
    /// Short code, e.g. `us`.
    pub short: String,
    /// Long description, e.g. `United States`.
    #[serde(default)]
    pub long: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for `POST /locations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateLocationDescriptor {
    /// Short code.
    pub short: String,
    /// Long description.
    pub long: String,
}

/// Body for `PATCH /locations/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateLocationDescriptor {
    /// New short code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// New long description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
}

/// A node running the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node id.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,
    /// Location the node belongs to.
    pub location_id: LocationId,
    /// Whether the node is used for automatic deployment.
    #[serde(default)]
    pub public: bool,
    /// Fully qualified domain name of the daemon.
    pub fqdn: String,
    /// `http` or `https`.
    pub scheme: String,
    /// Whether the daemon sits behind a proxy.
    #[serde(default)]
    pub behind_proxy: bool,
    /// Total memory in MiB.
    pub memory: i64,
    /// Memory overallocation in percent.
    #[serde(default)]
    pub memory_overallocate: i64,
    /// Total disk in MiB.
    pub disk: i64,
    /// Disk overallocation in percent.
    #[serde(default)]
    pub disk_overallocate: i64,
    /// Daemon data directory.
    #[serde(default)]
    pub daemon_base: String,
    /// SFTP port.
    pub daemon_sftp: u16,
    /// Daemon HTTP port.
    pub daemon_listen: u16,
    /// Whether the node is in maintenance mode.
    #[serde(default)]
    pub maintenance_mode: bool,
    /// Maximum upload size in MiB.
    #[serde(default)]
    pub upload_size: i64,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Node {
    /// Descriptor pre-filled with this node's current settings.
    #[must_use]
    pub fn update_descriptor(&self) -> UpdateNodeDescriptor {
        UpdateNodeDescriptor {
            name: Some(self.name.clone()),
            description: self.description.as_value().cloned(),
            location_id: Some(self.location_id),
            public: Some(self.public),
            fqdn: Some(self.fqdn.clone()),
            scheme: Some(self.scheme.clone()),
            behind_proxy: Some(self.behind_proxy),
            memory: Some(self.memory),
            memory_overallocate: Some(self.memory_overallocate),
            disk: Some(self.disk),
            disk_overallocate: Some(self.disk_overallocate),
            daemon_base: Some(self.daemon_base.clone()),
            daemon_sftp: Some(self.daemon_sftp),
            daemon_listen: Some(self.daemon_listen),
            maintenance_mode: Some(self.maintenance_mode),
            upload_size: Some(self.upload_size),
        }
    }
}

/// Daemon configuration document served by `GET /nodes/{id}/configuration`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeConfiguration {
    /// Debug mode.
    #[serde(default)]
    pub debug: bool,
    /// Node UUID.
    #[serde(default)]
    pub uuid: String,
    /// Daemon token id.
    #[serde(default)]
    pub token_id: String,
    /// Daemon token.
    #[serde(default)]
    pub token: String,
    /// Daemon API settings.
    #[serde(default)]
    pub api: NodeApiConfiguration,
    /// Daemon system settings.
    #[serde(default)]
    pub system: NodeSystemConfiguration,
    /// Host paths servers may mount.
    #[serde(default, deserialize_with = "empty_object_as_vec")]
    pub allowed_mounts: Vec<String>,
    /// Panel URL the daemon reports to.
    #[serde(default)]
    pub remote: String,
}

/// `api` block of a [`NodeConfiguration`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeApiConfiguration {
    /// Listen address.
    #[serde(default)]
    pub host: String,
    /// Listen port.
    #[serde(default)]
    pub port: u16,
    /// TLS settings.
    #[serde(default)]
    pub ssl: NodeSslConfiguration,
    /// Upload limit in MiB.
    #[serde(default)]
    pub upload_limit: i64,
}

/// `api.ssl` block of a [`NodeConfiguration`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSslConfiguration {
    /// Whether TLS is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Certificate path.
    #[serde(default)]
    pub cert: String,
    /// Key path.
    #[serde(default)]
    pub key: String,
}

/// `system` block of a [`NodeConfiguration`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSystemConfiguration {
    /// Data directory.
    #[serde(default)]
    pub data: String,
    /// SFTP settings.
    #[serde(default)]
    pub sftp: NodeSftpConfiguration,
}

/// `system.sftp` block of a [`NodeConfiguration`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSftpConfiguration {
    /// SFTP port.
    #[serde(default)]
    pub bind_port: u16,
}

/// Body for `POST /nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateNodeDescriptor {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location the node belongs to.
    pub location_id: LocationId,
    /// Whether the node is used for automatic deployment.
    pub public: bool,
    /// Fully qualified domain name of the daemon.
    pub fqdn: String,
    /// `http` or `https`.
    pub scheme: String,
    /// Whether the daemon sits behind a proxy.
    pub behind_proxy: bool,
    /// Total memory in MiB.
    pub memory: i64,
    /// Memory overallocation in percent.
    pub memory_overallocate: i64,
    /// Total disk in MiB.
    pub disk: i64,
    /// Disk overallocation in percent.
    pub disk_overallocate: i64,
    /// Daemon data directory.
    pub daemon_base: String,
    /// SFTP port.
    pub daemon_sftp: u16,
    /// Daemon HTTP port.
    pub daemon_listen: u16,
    /// Maximum upload size in MiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_size: Option<i64>,
}

/// Body for `PATCH /nodes/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct UpdateNodeDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behind_proxy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_overallocate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_overallocate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daemon_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daemon_sftp: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daemon_listen: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_size: Option<i64>,
}

/// Filters for `GET /nodes/deployable`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployableNodesDescriptor {
    /// Memory the new server needs, in MiB.
    pub memory: i64,
    /// Disk the new server needs, in MiB.
    pub disk: i64,
    /// Restrict to these locations.
    pub location_ids: Vec<LocationId>,
}

impl DeployableNodesDescriptor {
    /// Convert the filters into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push("memory", self.memory);
        params.push("disk", self.disk);
        params.push_each("location_ids[]", &self.location_ids);

        params.into_pairs()
    }
}

/// An IP:port pairing on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocation id.
    pub id: AllocationId,
    /// IP address.
    pub ip: String,
    /// Optional hostname alias for the IP.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub alias: Nullable<String>,
    /// Port.
    pub port: u16,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub notes: Nullable<String>,
    /// Whether a server uses this allocation.
    #[serde(default)]
    pub assigned: bool,
}

/// Body for `POST /nodes/{id}/allocations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAllocationsDescriptor {
    /// IP address, or CIDR range.
    pub ip: String,
    /// Optional hostname alias.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Ports or port ranges, e.g. `"25565"` or `"25565-25570"`.
    pub ports: Vec<String>,
}

/// A server as seen by the application API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Application-scope server id.
    pub id: ServerId,
    /// External id set by an integration.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub external_id: Nullable<String>,
    /// Server UUID.
    pub uuid: Uuid,
    /// Short identifier used by the client API.
    pub identifier: ServerIdentifier,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Lifecycle status (`installing`, `suspended`, ...), `null` when active.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub status: Nullable<String>,
    /// Whether the server is suspended.
    #[serde(default)]
    pub suspended: bool,
    /// Resource limits.
    pub limits: Limits,
    /// Feature limits.
    #[serde(default)]
    pub feature_limits: FeatureLimits,
    /// Owner.
    pub user: UserId,
    /// Node the server runs on.
    pub node: NodeId,
    /// Primary allocation.
    pub allocation: AllocationId,
    /// Nest of the egg.
    pub nest: NestId,
    /// Egg the server was created from.
    pub egg: EggId,
    /// Legacy service pack.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub pack: Nullable<u64>,
    /// Container settings.
    #[serde(default)]
    pub container: ServerContainer,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Container block of a [`Server`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerContainer {
    /// Startup command.
    #[serde(default)]
    pub startup_command: String,
    /// Docker image.
    #[serde(default)]
    pub image: String,
    /// Whether installation finished.
    #[serde(default, deserialize_with = "bool_or_int")]
    pub installed: bool,
    /// Environment variables.
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub environment: HashMap<String, Value>,
}

/// Allocation block of a [`CreateServerDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerAllocationDescriptor {
    /// Primary allocation.
    pub default: AllocationId,
    /// Extra allocations.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional: Vec<AllocationId>,
}

/// Body for `POST /servers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateServerDescriptor {
    /// Display name.
    pub name: String,
    /// Owner.
    pub user: UserId,
    /// Egg to install.
    pub egg: EggId,
    /// Docker image.
    pub docker_image: String,
    /// Startup command.
    pub startup: String,
    /// Egg variable values.
    pub environment: HashMap<String, Value>,
    /// Resource limits.
    pub limits: Limits,
    /// Feature limits.
    pub feature_limits: FeatureLimits,
    /// Allocations to assign.
    pub allocation: ServerAllocationDescriptor,
    /// External id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Skip the egg install script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_scripts: Option<bool>,
    /// Disable the OOM killer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oom_disabled: Option<bool>,
    /// Start the server once installed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_on_completion: Option<bool>,
}

/// Body for `PATCH /servers/{id}/details`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerDetailsDescriptor {
    /// External id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for `PATCH /servers/{id}/build`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerBuildDescriptor {
    /// New primary allocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation: Option<AllocationId>,
    /// Disable the OOM killer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oom_disabled: Option<bool>,
    /// Resource limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
    /// Allocations to attach.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_allocations: Vec<AllocationId>,
    /// Allocations to detach.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_allocations: Vec<AllocationId>,
    /// Feature limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_limits: Option<FeatureLimits>,
}

/// Body for `PATCH /servers/{id}/startup`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerStartupDescriptor {
    /// Startup command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup: Option<String>,
    /// Egg variable values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<HashMap<String, Value>>,
    /// Switch to another egg.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egg: Option<EggId>,
    /// Docker image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Skip the egg install script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_scripts: Option<bool>,
}

/// A panel user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: UserId,
    /// External id set by an integration.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub external_id: Nullable<String>,
    /// User UUID.
    pub uuid: Uuid,
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
    /// Whether the user is an administrator.
    #[serde(default)]
    pub root_admin: bool,
    /// Whether two-factor authentication is enabled.
    #[serde(default, rename = "2fa")]
    pub two_factor: bool,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// `"<first> <last>"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Descriptor pre-filled with this user's current profile (password left unset).
    #[must_use]
    pub fn update_descriptor(&self) -> UpdateUserDescriptor {
        UpdateUserDescriptor {
            external_id: self.external_id.as_value().cloned(),
            email: Some(self.email.clone()),
            username: Some(self.username.clone()),
            password: None,
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            language: Some(self.language.clone()),
            root_admin: Some(self.root_admin),
        }
    }
}

/// Body for `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserDescriptor {
    /// External id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Email address.
    pub email: String,
    /// Login name.
    pub username: String,
    /// Initial password; the panel emails a reset link when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Interface language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Administrator flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_admin: Option<bool>,
}

/// Body for `PATCH /users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct UpdateUserDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_admin: Option<bool>,
}

/// A nest groups related eggs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nest {
    /// Nest id.
    pub id: NestId,
    /// Nest UUID.
    pub uuid: Uuid,
    /// Author email.
    #[serde(default)]
    pub author: String,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A server template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Egg {
    /// Egg id.
    pub id: EggId,
    /// Egg UUID.
    pub uuid: Uuid,
    /// Name.
    pub name: String,
    /// Nest the egg belongs to.
    pub nest: NestId,
    /// Author email.
    #[serde(default)]
    pub author: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,
    /// Default docker image.
    #[serde(default)]
    pub docker_image: String,
    /// Daemon configuration.
    #[serde(default)]
    pub config: EggConfig,
    /// Default startup command.
    #[serde(default)]
    pub startup: String,
    /// Install script.
    #[serde(default)]
    pub script: EggScript,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Included relationships.
    #[serde(default)]
    pub relationships: EggRelationships,
}

impl Egg {
    /// Variables included with `?include=variables`.
    pub fn variables(&self) -> impl Iterator<Item = &EggVariable> {
        self.relationships.variables.iter()
    }
}

/// `config` block of an [`Egg`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EggConfig {
    /// Configuration files the daemon rewrites, keyed by path.
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub files: HashMap<String, EggFileConfig>,
    /// Startup detection.
    #[serde(default)]
    pub startup: EggStartup,
    /// Stop command.
    #[serde(default)]
    pub stop: String,
    /// Log settings.
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub logs: EggLogs,
    /// Egg the configuration is inherited from.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub extends: Nullable<String>,
}

/// One entry of [`EggConfig::files`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EggFileConfig {
    /// File parser (`properties`, `yaml`, `json`, ...).
    #[serde(default)]
    pub parser: String,
    /// Keys to replace and their values.
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub find: HashMap<String, Value>,
}

/// `config.startup` block of an [`Egg`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggStartup {
    /// Console line marking the server as started.
    #[serde(default)]
    pub done: String,
    /// Console lines that need user interaction.
    #[serde(
        default,
        rename = "userInteraction",
        deserialize_with = "empty_object_as_vec"
    )]
    pub user_interaction: Vec<String>,
}

/// `config.logs` block of an [`Egg`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggLogs {
    /// Whether logs go to a custom location.
    #[serde(default)]
    pub custom: bool,
    /// Log location.
    #[serde(default)]
    pub location: String,
}

/// `script` block of an [`Egg`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggScript {
    /// Run the install container privileged.
    #[serde(default)]
    pub privileged: bool,
    /// Install script body.
    #[serde(default)]
    pub install: String,
    /// Entrypoint.
    #[serde(default)]
    pub entry: String,
    /// Install container image.
    #[serde(default)]
    pub container: String,
    /// Egg the script is inherited from.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub extends: Nullable<String>,
}

/// `relationships` block of an [`Egg`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EggRelationships {
    /// Egg variables.
    #[serde(default)]
    pub variables: RelationshipList<EggVariable>,
}

/// A variable an egg exposes to its servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggVariable {
    /// Variable id.
    pub id: EggVariableId,
    /// Egg the variable belongs to.
    pub egg_id: EggId,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Environment variable name.
    pub env_variable: String,
    /// Default value.
    #[serde(default)]
    pub default_value: String,
    /// Whether users can see the variable.
    #[serde(default, deserialize_with = "bool_or_int")]
    pub user_viewable: bool,
    /// Whether users can edit the variable.
    #[serde(default, deserialize_with = "bool_or_int")]
    pub user_editable: bool,
    /// Validation rules.
    #[serde(default)]
    pub rules: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
