//! Asynchronous application API client implementation.

use crate::models::{
    Allocation, CreateAllocationsDescriptor, CreateLocationDescriptor, CreateNodeDescriptor,
    CreateServerDescriptor, CreateUserDescriptor, DeployableNodesDescriptor, Egg, Location, Nest,
    Node, NodeConfiguration, Server, ServerBuildDescriptor, ServerDetailsDescriptor,
    ServerStartupDescriptor, UpdateLocationDescriptor, UpdateNodeDescriptor, UpdateUserDescriptor,
    User,
};
use crate::Result;
use pterodactyl_core::client::{ClientConfig, PanelClient};
use pterodactyl_core::config::PanelConfig;
use pterodactyl_core::ids::{AllocationId, EggId, LocationId, NestId, NodeId, ServerId, UserId};
use pterodactyl_core::request::{path_segment, RequestFactory};
use pterodactyl_core::transport::{ReqwestTransport, Transport};
use pterodactyl_core::types::{AcceptHeader, ApiScope};
use pterodactyl_core::Error;
use reqwest::Method;
use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("pterodactyl-application/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ApplicationApi`].
#[derive(Clone)]
pub struct ApplicationApiBuilder {
    panel_url: String,
    token: Option<SecretString>,
    accept: AcceptHeader,
    per_page: Option<u32>,
    http: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for ApplicationApiBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationApiBuilder")
            .field("panel_url", &self.panel_url)
            .field("token", &self.token)
            .field("accept", &self.accept)
            .field("per_page", &self.per_page)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

impl ApplicationApiBuilder {
    /// Create a builder for the panel at `panel_url`.
    pub fn new(panel_url: impl Into<String>) -> Self {
        Self {
            panel_url: panel_url.into(),
            token: None,
            accept: AcceptHeader::default(),
            per_page: None,
            http: ClientConfig::new().with_user_agent(USER_AGENT),
            transport: None,
        }
    }

    /// Start from a validated [`PanelConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration is invalid or has no
    /// application token.
    pub fn from_config(config: &PanelConfig) -> Result<Self> {
        config.check()?;
        let token = config.token(ApiScope::Application)?.clone();

        let mut builder = Self::new(config.panel_url.clone())
            .with_secret_token(token)
            .with_accept(config.accept)
            .with_http_config(config.client_config().with_user_agent(USER_AGENT));
        builder.per_page = config.per_page;
        Ok(builder)
    }

    /// Set the application API token.
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.with_secret_token(SecretString::from(token.into()))
    }

    /// Set the application API token from an existing secret.
    #[must_use]
    pub fn with_secret_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Send the versioned `Accept` header.
    #[must_use]
    pub const fn with_accept(mut self, accept: AcceptHeader) -> Self {
        self.accept = accept;
        self
    }

    /// Ask for `per_page` entities per collection page.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http = config;
        self
    }

    /// Send requests through a custom transport instead of `reqwest`.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a malformed panel URL, a missing or empty token, or
    /// an HTTP client that cannot be built.
    pub fn build(self) -> Result<ApplicationApi> {
        let token = self
            .token
            .ok_or_else(|| Error::Config("No application API token configured".to_string()))?;
        let requests =
            RequestFactory::new(&self.panel_url, ApiScope::Application, &token, self.accept)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.http)?),
        };

        let inner = PanelClient::new(transport, requests).with_per_page(self.per_page);
        debug!(base_url = %inner.base_url(), "application API client ready");

        Ok(ApplicationApi { inner })
    }
}

/// Asynchronous client for `/api/application`.
#[derive(Clone, Debug)]
pub struct ApplicationApi {
    inner: PanelClient,
}

impl ApplicationApi {
    /// Construct a client directly from the panel URL and an application token.
    ///
    /// # Errors
    ///
    /// See [`ApplicationApiBuilder::build`].
    pub fn new(panel_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        ApplicationApiBuilder::new(panel_url).with_token(token).build()
    }

    /// Construct a client from a [`PanelConfig`].
    ///
    /// # Errors
    ///
    /// See [`ApplicationApiBuilder::from_config`] and [`ApplicationApiBuilder::build`].
    pub fn from_config(config: &PanelConfig) -> Result<Self> {
        ApplicationApiBuilder::from_config(config)?.build()
    }

    /// Return the base URL (`<panel>/api/application/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    // Locations

    /// List every location.
    pub async fn list_locations(&self) -> Result<Vec<Location>> {
        self.inner.get_all("locations", &[]).await
    }

    /// Fetch a single location.
    pub async fn get_location(&self, id: LocationId) -> Result<Location> {
        self.inner.get_item(&format!("locations/{id}"), &[]).await
    }

    /// Create a location.
    pub async fn create_location(&self, fields: &CreateLocationDescriptor) -> Result<Location> {
        self.inner
            .send_item(Method::POST, "locations", fields)
            .await
    }

    /// Update a location. An empty descriptor is rejected without a request.
    pub async fn update_location(
        &self,
        id: LocationId,
        fields: &UpdateLocationDescriptor,
    ) -> Result<Location> {
        let path = format!("locations/{id}");
        self.inner
            .update_item(Method::PATCH, &path, fields, "update")
            .await
    }

    /// Delete a location.
    pub async fn delete_location(&self, id: LocationId) -> Result<()> {
        let path = format!("locations/{id}");
        self.inner.send_empty::<()>(Method::DELETE, &path, None).await
    }

    // Nodes

    /// List every node.
    pub async fn list_nodes(&self) -> Result<Vec<Node>> {
        self.inner.get_all("nodes", &[]).await
    }

    /// Fetch a single node.
    pub async fn get_node(&self, id: NodeId) -> Result<Node> {
        self.inner.get_item(&format!("nodes/{id}"), &[]).await
    }

    /// List nodes with room for a server of the given size.
    pub async fn list_deployable_nodes(
        &self,
        fields: &DeployableNodesDescriptor,
    ) -> Result<Vec<Node>> {
        self.inner
            .get_all("nodes/deployable", &fields.to_pairs())
            .await
    }

    /// Fetch the daemon configuration of a node.
    pub async fn get_node_configuration(&self, id: NodeId) -> Result<NodeConfiguration> {
        self.inner
            .get_plain(&format!("nodes/{id}/configuration"))
            .await
    }

    /// Create a node.
    pub async fn create_node(&self, fields: &CreateNodeDescriptor) -> Result<Node> {
        self.inner.send_item(Method::POST, "nodes", fields).await
    }

    /// Update a node. An empty descriptor is rejected without a request.
    pub async fn update_node(&self, id: NodeId, fields: &UpdateNodeDescriptor) -> Result<Node> {
        let path = format!("nodes/{id}");
        self.inner
            .update_item(Method::PATCH, &path, fields, "update")
            .await
    }

    /// Delete a node.
    pub async fn delete_node(&self, id: NodeId) -> Result<()> {
        let path = format!("nodes/{id}");
        self.inner.send_empty::<()>(Method::DELETE, &path, None).await
    }

    // Node allocations

    /// List every allocation on a node.
    pub async fn list_node_allocations(&self, node: NodeId) -> Result<Vec<Allocation>> {
        self.inner
            .get_all(&format!("nodes/{node}/allocations"), &[])
            .await
    }

    /// Find the allocation on `node` bound to `port`, if any.
    pub async fn find_node_allocation_by_port(
        &self,
        node: NodeId,
        port: u16,
    ) -> Result<Option<Allocation>> {
        let allocations = self.list_node_allocations(node).await?;
        Ok(allocations.into_iter().find(|a| a.port == port))
    }

    /// Create allocations on a node.
    pub async fn create_node_allocations(
        &self,
        node: NodeId,
        fields: &CreateAllocationsDescriptor,
    ) -> Result<()> {
        let path = format!("nodes/{node}/allocations");
        self.inner
            .send_empty(Method::POST, &path, Some(fields))
            .await
    }

    /// Delete an allocation from a node.
    pub async fn delete_node_allocation(&self, node: NodeId, id: AllocationId) -> Result<()> {
        let path = format!("nodes/{node}/allocations/{id}");
        self.inner.send_empty::<()>(Method::DELETE, &path, None).await
    }

    // Servers

    /// List every server.
    pub async fn list_servers(&self) -> Result<Vec<Server>> {
        self.inner.get_all("servers", &[]).await
    }

    /// Fetch a single server.
    pub async fn get_server(&self, id: ServerId) -> Result<Server> {
        self.inner.get_item(&format!("servers/{id}"), &[]).await
    }

    /// Fetch a server by its external id.
    pub async fn get_server_by_external_id(&self, external_id: &str) -> Result<Server> {
        let external_id = path_segment(external_id, "external id")?;
        self.inner
            .get_item(&format!("servers/external/{external_id}"), &[])
            .await
    }

    /// Create a server.
    pub async fn create_server(&self, fields: &CreateServerDescriptor) -> Result<Server> {
        self.inner.send_item(Method::POST, "servers", fields).await
    }

    /// Update name, owner, description or external id.
    pub async fn update_server_details(
        &self,
        id: ServerId,
        fields: &ServerDetailsDescriptor,
    ) -> Result<Server> {
        let path = format!("servers/{id}/details");
        self.inner
            .update_item(Method::PATCH, &path, fields, "details")
            .await
    }

    /// Update limits and allocations.
    pub async fn update_server_build(
        &self,
        id: ServerId,
        fields: &ServerBuildDescriptor,
    ) -> Result<Server> {
        let path = format!("servers/{id}/build");
        self.inner
            .update_item(Method::PATCH, &path, fields, "build")
            .await
    }

    /// Update startup command, image, egg or environment.
    pub async fn update_server_startup(
        &self,
        id: ServerId,
        fields: &ServerStartupDescriptor,
    ) -> Result<Server> {
        let path = format!("servers/{id}/startup");
        self.inner
            .update_item(Method::PATCH, &path, fields, "startup")
            .await
    }

    /// Suspend a server.
    pub async fn suspend_server(&self, id: ServerId) -> Result<()> {
        self.server_action(id, "suspend").await
    }

    /// Lift a suspension.
    pub async fn unsuspend_server(&self, id: ServerId) -> Result<()> {
        self.server_action(id, "unsuspend").await
    }

    /// Run the egg install script again.
    pub async fn reinstall_server(&self, id: ServerId) -> Result<()> {
        self.server_action(id, "reinstall").await
    }

    /// Delete a server; `force` deletes it even when the daemon cannot be reached.
    pub async fn delete_server(&self, id: ServerId, force: bool) -> Result<()> {
        let mut path = format!("servers/{id}");
        if force {
            path.push_str("/force");
        }
        self.inner.send_empty::<()>(Method::DELETE, &path, None).await
    }

    async fn server_action(&self, id: ServerId, action: &str) -> Result<()> {
        let path = format!("servers/{id}/{action}");
        self.inner.send_empty::<()>(Method::POST, &path, None).await
    }

    // Users

    /// List every user.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.inner.get_all("users", &[]).await
    }

    /// Fetch a single user.
    pub async fn get_user(&self, id: UserId) -> Result<User> {
        self.inner.get_item(&format!("users/{id}"), &[]).await
    }

    /// Fetch a user by external id.
    pub async fn get_user_by_external_id(&self, external_id: &str) -> Result<User> {
        let external_id = path_segment(external_id, "external id")?;
        self.inner
            .get_item(&format!("users/external/{external_id}"), &[])
            .await
    }

    /// Create a user.
    pub async fn create_user(&self, fields: &CreateUserDescriptor) -> Result<User> {
        self.inner.send_item(Method::POST, "users", fields).await
    }

    /// Update a user. An empty descriptor is rejected without a request.
    pub async fn update_user(&self, id: UserId, fields: &UpdateUserDescriptor) -> Result<User> {
        let path = format!("users/{id}");
        self.inner
            .update_item(Method::PATCH, &path, fields, "update")
            .await
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        let path = format!("users/{id}");
        self.inner.send_empty::<()>(Method::DELETE, &path, None).await
    }

    // Nests and eggs

    /// List every nest.
    pub async fn list_nests(&self) -> Result<Vec<Nest>> {
        self.inner.get_all("nests", &[]).await
    }

    /// Fetch a single nest.
    pub async fn get_nest(&self, id: NestId) -> Result<Nest> {
        self.inner.get_item(&format!("nests/{id}"), &[]).await
    }

    /// List the eggs of a nest.
    pub async fn list_nest_eggs(&self, nest: NestId) -> Result<Vec<Egg>> {
        self.inner.get_all(&format!("nests/{nest}/eggs"), &[]).await
    }

    /// Fetch an egg together with its variables.
    pub async fn get_egg(&self, nest: NestId, id: EggId) -> Result<Egg> {
        self.inner
            .get_item(
                &format!("nests/{nest}/eggs/{id}"),
                &[("include", "variables".to_string())],
            )
            .await
    }
}
