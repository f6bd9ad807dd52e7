//! Asynchronous client API implementation.

use crate::models::{
    Account, ApiKey, ChmodDescriptor, ClientDatabase, ClientServer, CompressDescriptor,
    CreateApiKeyDescriptor, CreateDatabaseDescriptor, CreateFolderDescriptor, CreatedApiKey,
    DecompressDescriptor, DeleteFilesDescriptor, File, PowerSignal, PullDescriptor,
    RenameDescriptor, Stats, WebSocketAuth,
};
use crate::transfer::{signed_url, Downloader, Uploader};
use crate::Result;
use bytes::Bytes;
use pterodactyl_core::client::{ClientConfig, PanelClient};
use pterodactyl_core::config::PanelConfig;
use pterodactyl_core::envelope::{decode_item, decode_plain};
use pterodactyl_core::ids::{ApiKeyIdentifier, DatabaseId, ServerIdentifier};
use pterodactyl_core::request::{path_segment, RequestFactory};
use pterodactyl_core::transport::{ReqwestTransport, Transport};
use pterodactyl_core::types::{AcceptHeader, ApiScope};
use pterodactyl_core::Error;
use reqwest::Method;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("pterodactyl-client/", env!("CARGO_PKG_VERSION"));

/// `Accept` value the file contents endpoint requires.
const FILE_CONTENTS_ACCEPT: &str = "application/json,text/plain";

#[derive(Deserialize)]
struct SignedUrl {
    url: String,
}

#[derive(Deserialize)]
struct TwoFactorImage {
    image_url_data: String,
}

#[derive(Deserialize)]
struct RecoveryTokens {
    #[serde(default)]
    tokens: Vec<String>,
}

#[derive(Deserialize)]
struct CreatedKeyEnvelope {
    attributes: ApiKey,
    #[serde(default)]
    meta: CreatedKeyMeta,
}

#[derive(Default, Deserialize)]
struct CreatedKeyMeta {
    #[serde(default)]
    secret_token: Option<String>,
}

/// Builder for [`ClientApi`].
#[derive(Clone)]
pub struct ClientApiBuilder {
    panel_url: String,
    token: Option<SecretString>,
    accept: AcceptHeader,
    per_page: Option<u32>,
    http: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for ClientApiBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientApiBuilder")
            .field("panel_url", &self.panel_url)
            .field("token", &self.token)
            .field("accept", &self.accept)
            .field("per_page", &self.per_page)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

impl ClientApiBuilder {
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
    /// Returns [`Error::Config`] when the configuration is invalid or has no client token.
    pub fn from_config(config: &PanelConfig) -> Result<Self> {
        config.check()?;
        let token = config.token(ApiScope::Client)?.clone();

        let mut builder = Self::new(config.panel_url.clone())
            .with_secret_token(token)
            .with_accept(config.accept)
            .with_http_config(config.client_config().with_user_agent(USER_AGENT));
        builder.per_page = config.per_page;
        Ok(builder)
    }

    /// Set the client API token.
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.with_secret_token(SecretString::from(token.into()))
    }

    /// Set the client API token from an existing secret.
    #[must_use]
    pub fn with_secret_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Choose the `Accept` header variant.
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
    pub fn build(self) -> Result<ClientApi> {
        let token = self
            .token
            .ok_or_else(|| Error::Config("No client API token configured".to_string()))?;
        let requests = RequestFactory::new(&self.panel_url, ApiScope::Client, &token, self.accept)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.http)?),
        };

        let inner = PanelClient::new(transport, requests).with_per_page(self.per_page);
        debug!(base_url = %inner.base_url(), "client API client ready");

        Ok(ClientApi { inner })
    }
}

/// Asynchronous client for `/api/client`.
#[derive(Clone, Debug)]
pub struct ClientApi {
    inner: PanelClient,
}

impl ClientApi {
    /// Construct a client directly from the panel URL and a client token.
    ///
    /// # Errors
    ///
    /// See [`ClientApiBuilder::build`].
    pub fn new(panel_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        ClientApiBuilder::new(panel_url).with_token(token).build()
    }

    /// Construct a client from a [`PanelConfig`].
    ///
    /// # Errors
    ///
    /// See [`ClientApiBuilder::from_config`] and [`ClientApiBuilder::build`].
    pub fn from_config(config: &PanelConfig) -> Result<Self> {
        ClientApiBuilder::from_config(config)?.build()
    }

    /// Return the base URL (`<panel>/api/client/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    // Servers

    /// List every server the token can access.
    pub async fn list_servers(&self) -> Result<Vec<ClientServer>> {
        self.inner.get_all("", &[]).await
    }

    /// Fetch a single server.
    pub async fn get_server(&self, id: &ServerIdentifier) -> Result<ClientServer> {
        self.inner.get_item(&server_path(id, "")?, &[]).await
    }

    /// Fetch console websocket credentials.
    pub async fn get_server_websocket(&self, id: &ServerIdentifier) -> Result<WebSocketAuth> {
        self.inner.get_data(&server_path(id, "websocket")?).await
    }

    /// Fetch live resource usage.
    pub async fn get_server_resources(&self, id: &ServerIdentifier) -> Result<Stats> {
        self.inner.get_item(&server_path(id, "resources")?, &[]).await
    }

    /// Send a console command.
    pub async fn send_command(&self, id: &ServerIdentifier, command: &str) -> Result<()> {
        let path = server_path(id, "command")?;
        self.inner
            .send_empty(Method::POST, &path, Some(&json!({ "command": command })))
            .await
    }

    /// Change the power state of a server.
    pub async fn set_power_state(&self, id: &ServerIdentifier, signal: PowerSignal) -> Result<()> {
        let path = server_path(id, "power")?;
        self.inner
            .send_empty(Method::POST, &path, Some(&json!({ "signal": signal })))
            .await
    }

    // Databases

    /// List the databases of a server.
    pub async fn list_databases(&self, id: &ServerIdentifier) -> Result<Vec<ClientDatabase>> {
        self.inner.get_list(&server_path(id, "databases")?, &[]).await
    }

    /// Create a database.
    pub async fn create_database(
        &self,
        id: &ServerIdentifier,
        fields: &CreateDatabaseDescriptor,
    ) -> Result<ClientDatabase> {
        let path = server_path(id, "databases")?;
        self.inner.send_item(Method::POST, &path, fields).await
    }

    /// Generate a new password for a database; the result carries it.
    pub async fn rotate_database_password(
        &self,
        id: &ServerIdentifier,
        database: &DatabaseId,
    ) -> Result<ClientDatabase> {
        let database = path_segment(database.as_str(), "database id")?;
        let path = server_path(id, &format!("databases/{database}/rotate-password"))?;
        self.inner
            .send_with(Method::POST, &path, None::<&Value>, decode_item)
            .await
    }

    /// Delete a database.
    pub async fn delete_database(&self, id: &ServerIdentifier, database: &DatabaseId) -> Result<()> {
        let database = path_segment(database.as_str(), "database id")?;
        let path = server_path(id, &format!("databases/{database}"))?;
        self.inner.send_empty::<()>(Method::DELETE, &path, None).await
    }

    // Files

    /// List a directory.
    pub async fn list_files(&self, id: &ServerIdentifier, directory: &str) -> Result<Vec<File>> {
        let path = server_path(id, "files/list")?;
        self.inner
            .get_list(&path, &[("directory", directory.to_string())])
            .await
    }

    /// Read a file.
    pub async fn get_file_contents(&self, id: &ServerIdentifier, file: &str) -> Result<Bytes> {
        let path = server_path(id, "files/contents")?;
        self.inner
            .get_bytes(&path, &[("file", file.to_string())], FILE_CONTENTS_ACCEPT)
            .await
    }

    /// Request a signed download URL for `file`.
    ///
    /// The parent directory is listed first so a directory is rejected before a URL is
    /// issued. The returned [`Downloader`] writes to the file's base name in the working
    /// directory unless given another path.
    pub async fn download_file(&self, id: &ServerIdentifier, file: &str) -> Result<Downloader> {
        let (parent, name) = split_remote_path(file)?;
        let entries = self.list_files(id, &parent).await?;
        if entries
            .iter()
            .any(|entry| entry.name == name && entry.is_directory())
        {
            return Err(Error::Validation("cannot download a directory".to_string()));
        }

        let path = server_path(id, "files/download")?;
        let signed: SignedUrl = self
            .inner
            .get_item(&path, &[("file", file.to_string())])
            .await?;

        Ok(Downloader::new(
            Arc::clone(self.inner.transport()),
            signed_url(&signed.url)?,
            name,
        ))
    }

    /// Rename or move files.
    pub async fn rename_files(&self, id: &ServerIdentifier, fields: &RenameDescriptor) -> Result<()> {
        let path = server_path(id, "files/rename")?;
        self.inner.send_empty(Method::PUT, &path, Some(fields)).await
    }

    /// Duplicate a file next to itself.
    pub async fn copy_file(&self, id: &ServerIdentifier, location: &str) -> Result<()> {
        let path = server_path(id, "files/copy")?;
        self.inner
            .send_empty(Method::POST, &path, Some(&json!({ "location": location })))
            .await
    }

    /// Write raw bytes to a file, creating or truncating it.
    pub async fn write_file(
        &self,
        id: &ServerIdentifier,
        file: &str,
        content_type: &str,
        data: impl Into<Bytes>,
    ) -> Result<()> {
        let path = server_path(id, "files/write")?;
        self.inner
            .send_raw(
                Method::POST,
                &path,
                &[("file", file.to_string())],
                content_type,
                data.into(),
            )
            .await
    }

    /// Write text to a file as `text/plain`.
    pub async fn write_file_text(
        &self,
        id: &ServerIdentifier,
        file: &str,
        content: impl Into<String>,
    ) -> Result<()> {
        let content: String = content.into();
        self.write_file(id, file, "text/plain", content).await
    }

    /// Archive files; returns the created archive.
    pub async fn compress_files(
        &self,
        id: &ServerIdentifier,
        fields: &CompressDescriptor,
    ) -> Result<File> {
        let path = server_path(id, "files/compress")?;
        self.inner.send_item(Method::POST, &path, fields).await
    }

    /// Extract an archive.
    pub async fn decompress_file(
        &self,
        id: &ServerIdentifier,
        fields: &DecompressDescriptor,
    ) -> Result<()> {
        let path = server_path(id, "files/decompress")?;
        self.inner.send_empty(Method::POST, &path, Some(fields)).await
    }

    /// Delete files.
    pub async fn delete_files(
        &self,
        id: &ServerIdentifier,
        fields: &DeleteFilesDescriptor,
    ) -> Result<()> {
        let path = server_path(id, "files/delete")?;
        self.inner.send_empty(Method::POST, &path, Some(fields)).await
    }

    /// Create a folder.
    pub async fn create_folder(
        &self,
        id: &ServerIdentifier,
        fields: &CreateFolderDescriptor,
    ) -> Result<()> {
        let path = server_path(id, "files/create-folder")?;
        self.inner.send_empty(Method::POST, &path, Some(fields)).await
    }

    /// Change file modes.
    pub async fn chmod_files(&self, id: &ServerIdentifier, fields: &ChmodDescriptor) -> Result<()> {
        let path = server_path(id, "files/chmod")?;
        self.inner.send_empty(Method::POST, &path, Some(fields)).await
    }

    /// Have the daemon fetch a remote file.
    pub async fn pull_file(&self, id: &ServerIdentifier, fields: &PullDescriptor) -> Result<()> {
        let path = server_path(id, "files/pull")?;
        self.inner.send_empty(Method::POST, &path, Some(fields)).await
    }

    /// Request a signed upload URL; the returned [`Uploader`] sends the local file at
    /// `local_path`.
    pub async fn upload_file(
        &self,
        id: &ServerIdentifier,
        local_path: impl Into<PathBuf>,
    ) -> Result<Uploader> {
        let path = server_path(id, "files/upload")?;
        let signed: SignedUrl = self.inner.get_item(&path, &[]).await?;

        Ok(Uploader::new(
            Arc::clone(self.inner.transport()),
            signed_url(&signed.url)?,
            local_path.into(),
        ))
    }

    // Account

    /// Fetch the account the token belongs to.
    pub async fn get_account(&self) -> Result<Account> {
        self.inner.get_item("account", &[]).await
    }

    /// Fetch the two-factor enrollment QR code as a data URL.
    pub async fn get_two_factor_image(&self) -> Result<String> {
        let image: TwoFactorImage = self.inner.get_data("account/two-factor").await?;
        Ok(image.image_url_data)
    }

    /// Enable two-factor authentication; returns the recovery tokens.
    pub async fn enable_two_factor(&self, code: &str) -> Result<Vec<String>> {
        let tokens: RecoveryTokens = self
            .inner
            .send_with(
                Method::POST,
                "account/two-factor",
                Some(&json!({ "code": code })),
                decode_item,
            )
            .await?;
        Ok(tokens.tokens)
    }

    /// Disable two-factor authentication.
    pub async fn disable_two_factor(&self, password: &str) -> Result<()> {
        self.inner
            .send_empty(
                Method::DELETE,
                "account/two-factor",
                Some(&json!({ "password": password })),
            )
            .await
    }

    /// Change the account email.
    pub async fn update_email(&self, email: &str, password: &str) -> Result<()> {
        self.inner
            .send_empty(
                Method::PUT,
                "account/email",
                Some(&json!({ "email": email, "password": password })),
            )
            .await
    }

    /// Change the account password.
    pub async fn update_password(&self, current: &str, new: &str) -> Result<()> {
        let body = json!({
            "current_password": current,
            "password": new,
            "password_confirmation": new,
        });
        self.inner
            .send_empty(Method::PUT, "account/password", Some(&body))
            .await
    }

    /// List the account's API keys.
    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>> {
        self.inner.get_list("account/api-keys", &[]).await
    }

    /// Create an API key.
    pub async fn create_api_key(&self, fields: &CreateApiKeyDescriptor) -> Result<CreatedApiKey> {
        let created: CreatedKeyEnvelope = self
            .inner
            .send_with(Method::POST, "account/api-keys", Some(fields), decode_plain)
            .await?;

        Ok(CreatedApiKey {
            key: created.attributes,
            secret_token: created.meta.secret_token.map(SecretString::from),
        })
    }

    /// Delete an API key.
    pub async fn delete_api_key(&self, identifier: &ApiKeyIdentifier) -> Result<()> {
        let identifier = path_segment(identifier.as_str(), "API key identifier")?;
        let path = format!("account/api-keys/{identifier}");
        self.inner.send_empty::<()>(Method::DELETE, &path, None).await
    }
}

fn server_path(id: &ServerIdentifier, rest: &str) -> Result<String> {
    let id = path_segment(id.as_str(), "server identifier")?;
    if rest.is_empty() {
        Ok(format!("servers/{id}"))
    } else {
        Ok(format!("servers/{id}/{rest}"))
    }
}

// "/plugins/a.jar" -> ("/plugins", "a.jar"), "a.jar" -> ("/", "a.jar")
fn split_remote_path(file: &str) -> Result<(String, String)> {
    let trimmed = file.trim_end_matches('/');
    let (parent, name) = match trimmed.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", trimmed),
    };
    if name.is_empty() {
        return Err(Error::Validation(format!("invalid file path: {file:?}")));
    }
    let parent = if parent.is_empty() { "/" } else { parent };
    Ok((parent.to_string(), name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChmodFile, RenameFile};
    use pterodactyl_core::ids::UserId;
    use secrecy::ExposeSecret;
    use wiremock::matchers::{body_json, body_string, header, headers, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ClientApi {
        ClientApi::new(server.uri(), "ptlc_test").unwrap()
    }

    fn lobby() -> ServerIdentifier {
        ServerIdentifier::new("1a7ce997")
    }

    fn file_json(name: &str, mimetype: &str, is_file: bool) -> Value {
        json!({
            "object": "file_object",
            "attributes": {
                "name": name, "mode": "-rw-r--r--", "mode_bits": "644", "size": 1024,
                "is_file": is_file, "is_symlink": false, "mimetype": mimetype,
                "created_at": "2020-07-18T17:06:17+00:00",
                "modified_at": "2020-07-18T17:06:17+00:00"
            }
        })
    }

    #[test]
    fn build_requires_token() {
        let err = ClientApiBuilder::new("https://panel.example.com")
            .build()
            .unwrap_err();
        assert_eq!(err, Error::Config("No client API token configured".to_string()));
    }

    #[test]
    fn from_config_uses_client_token() {
        let config = PanelConfig::new("https://panel.example.com")
            .unwrap()
            .with_application_token("ptla_only");
        assert!(matches!(ClientApi::from_config(&config), Err(Error::Config(_))));

        let api = ClientApi::from_config(&config.with_client_token("ptlc_abc")).unwrap();
        assert_eq!(api.base_url().as_str(), "https://panel.example.com/api/client/");
    }

    #[test]
    fn remote_paths_split_into_parent_and_name() {
        assert_eq!(
            split_remote_path("/plugins/a.jar").unwrap(),
            ("/plugins".to_string(), "a.jar".to_string())
        );
        assert_eq!(
            split_remote_path("server.properties").unwrap(),
            ("/".to_string(), "server.properties".to_string())
        );
        assert_eq!(
            split_remote_path("/logs/").unwrap(),
            ("/".to_string(), "logs".to_string())
        );
        assert!(split_remote_path("/").is_err());
    }

    #[test]
    fn server_identifiers_are_single_segments() {
        assert_eq!(server_path(&lobby(), "power").unwrap(), "servers/1a7ce997/power");
        let err = server_path(&ServerIdentifier::new("../users"), "").unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn websocket_reads_data_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/client/servers/1a7ce997/websocket"))
            .and(header("authorization", "Bearer ptlc_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "token": "eyJ0eXAi", "socket": "wss://node.example.com:8080/api/servers/1a7ce997/ws" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = test_client(&server).get_server_websocket(&lobby()).await.unwrap();
        assert_eq!(auth.socket, "wss://node.example.com:8080/api/servers/1a7ce997/ws");
        assert_eq!(auth.token.expose_secret(), "eyJ0eXAi");
    }

    #[tokio::test]
    async fn resources_decode_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/client/servers/1a7ce997/resources"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "stats",
                "attributes": {
                    "current_state": "running",
                    "is_suspended": false,
                    "resources": {
                        "memory_bytes": 588_701_696, "cpu_absolute": 0.5, "disk_bytes": 130_156_361,
                        "network_rx_bytes": 694_220, "network_tx_bytes": 337_090, "uptime": 1_200_000
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let stats = test_client(&server).get_server_resources(&lobby()).await.unwrap();
        assert_eq!(stats.state, "running");
        assert_eq!(stats.resources.memory_bytes, 588_701_696);
        assert!((stats.resources.cpu_absolute - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn power_and_command_post_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/client/servers/1a7ce997/power"))
            .and(body_json(json!({ "signal": "restart" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/client/servers/1a7ce997/command"))
            .and(body_json(json!({ "command": "say hello" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .set_power_state(&lobby(), PowerSignal::Restart)
            .await
            .unwrap();
        client.send_command(&lobby(), "say hello").await.unwrap();
    }

    #[tokio::test]
    async fn bad_gateway_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/client/servers/1a7ce997/command"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .send_command(&lobby(), "list")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::Server {
                status: 502,
                body: "bad gateway".to_string()
            }
        );
    }

    #[tokio::test]
    async fn database_lifecycle() {
        let server = MockServer::start().await;
        let database = json!({
            "object": "server_database",
            "attributes": {
                "id": "bEY4yAD5", "host": { "address": "127.0.0.1", "port": 3306 },
                "name": "s5_perms", "username": "u5_QsIAp1jhvS", "connections_from": "%",
                "max_connections": 0,
                "relationships": { "password": { "object": "database_password", "attributes": { "password": "rotated" } } }
            }
        });
        Mock::given(method("GET"))
            .and(path("/api/client/servers/1a7ce997/databases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list", "data": [database.clone()]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/client/servers/1a7ce997/databases"))
            .and(body_json(json!({ "database": "perms", "remote": "%" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(database.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/client/servers/1a7ce997/databases/bEY4yAD5/rotate-password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(database))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/client/servers/1a7ce997/databases/bEY4yAD5"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let listed = client.list_databases(&lobby()).await.unwrap();
        assert_eq!(listed.len(), 1);

        let created = client
            .create_database(
                &lobby(),
                &CreateDatabaseDescriptor {
                    database: "perms".into(),
                    remote: "%".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.host.port, 3306);

        let rotated = client
            .rotate_database_password(&lobby(), &created.id)
            .await
            .unwrap();
        assert_eq!(rotated.password(), Some("rotated"));

        client.delete_database(&lobby(), &created.id).await.unwrap();
    }

    #[tokio::test]
    async fn list_files_sends_directory_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/client/servers/1a7ce997/files/list"))
            .and(query_param("directory", "/world data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [file_json("region", "inode/directory", false), file_json("level.dat", "application/octet-stream", true)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let files = test_client(&server)
            .list_files(&lobby(), "/world data")
            .await
            .unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].is_directory());
        assert!(!files[1].is_directory());
    }

    #[tokio::test]
    async fn file_contents_use_text_accept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/client/servers/1a7ce997/files/contents"))
            .and(query_param("file", "/server.properties"))
            .and(headers("accept", vec!["application/json", "text/plain"]))
            .respond_with(ResponseTemplate::new(200).set_body_string("motd=A Minecraft Server\n"))
            .expect(1)
            .mount(&server)
            .await;

        let contents = test_client(&server)
            .get_file_contents(&lobby(), "/server.properties")
            .await
            .unwrap();
        assert_eq!(contents, Bytes::from_static(b"motd=A Minecraft Server\n"));
    }

    #[tokio::test]
    async fn write_file_sends_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/client/servers/1a7ce997/files/write"))
            .and(query_param("file", "/eula.txt"))
            .and(header("content-type", "text/plain"))
            .and(body_string("eula=true"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .write_file_text(&lobby(), "/eula.txt", "eula=true")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn file_management_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/client/servers/1a7ce997/files/rename"))
            .and(body_json(json!({ "root": "/", "files": [{ "from": "a.txt", "to": "b.txt" }] })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/client/servers/1a7ce997/files/chmod"))
            .and(body_json(json!({ "root": "/", "files": [{ "file": "start.sh", "mode": 755 }] })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/client/servers/1a7ce997/files/compress"))
            .and(body_json(json!({ "root": "/", "files": ["world"] })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(file_json("archive-2020-07-18.tar.gz", "application/tar+gzip", true)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .rename_files(
                &lobby(),
                &RenameDescriptor {
                    root: "/".into(),
                    files: vec![RenameFile {
                        from: "a.txt".into(),
                        to: "b.txt".into(),
                    }],
                },
            )
            .await
            .unwrap();
        client
            .chmod_files(
                &lobby(),
                &ChmodDescriptor {
                    root: "/".into(),
                    files: vec![ChmodFile {
                        file: "start.sh".into(),
                        mode: 755,
                    }],
                },
            )
            .await
            .unwrap();

        let archive = client
            .compress_files(
                &lobby(),
                &CompressDescriptor {
                    root: "/".into(),
                    files: vec!["world".into()],
                },
            )
            .await
            .unwrap();
        assert_eq!(archive.name, "archive-2020-07-18.tar.gz");
    }

    #[tokio::test]
    async fn download_rejects_directories_before_signing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/client/servers/1a7ce997/files/list"))
            .and(query_param("directory", "/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list", "data": [file_json("world", "inode/directory", false)]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/client/servers/1a7ce997/files/download"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .download_file(&lobby(), "/world")
            .await
            .unwrap_err();
        assert_eq!(err, Error::Validation("cannot download a directory".into()));
    }

    #[tokio::test]
    async fn account_and_two_factor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/client/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "user",
                "attributes": {
                    "id": 1, "admin": true, "username": "admin", "email": "admin@example.com",
                    "first_name": "Admin", "last_name": "User", "language": "en"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/client/account/two-factor"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "image_url_data": "otpauth://totp/Pterodactyl:admin@example.com?secret=ABC" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/client/account/two-factor"))
            .and(body_json(json!({ "code": "123456" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "recovery_tokens",
                "attributes": { "tokens": ["aaaa-bbbb", "cccc-dddd"] }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/client/account/two-factor"))
            .and(body_json(json!({ "password": "hunter2" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let account = client.get_account().await.unwrap();
        assert_eq!(account.id, UserId::new(1));
        assert_eq!(account.full_name(), "Admin User");

        let image = client.get_two_factor_image().await.unwrap();
        assert!(image.starts_with("otpauth://"));

        let tokens = client.enable_two_factor("123456").await.unwrap();
        assert_eq!(tokens, vec!["aaaa-bbbb", "cccc-dddd"]);

        client.disable_two_factor("hunter2").await.unwrap();
    }

    #[tokio::test]
    async fn password_update_repeats_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/client/account/password"))
            .and(body_json(json!({
                "current_password": "old",
                "password": "new",
                "password_confirmation": "new"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/client/account/email"))
            .and(body_json(json!({ "email": "new@example.com", "password": "new" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.update_password("old", "new").await.unwrap();
        client.update_email("new@example.com", "new").await.unwrap();
    }

    #[tokio::test]
    async fn api_key_lifecycle() {
        let server = MockServer::start().await;
        let key = json!({
            "identifier": "wwQ5DJ6X1XaFznQS", "description": "CI", "allowed_ips": ["10.0.0.1"],
            "last_used_at": null, "created_at": "2020-06-03T15:04:47+01:00"
        });
        Mock::given(method("POST"))
            .and(path("/api/client/account/api-keys"))
            .and(body_json(json!({ "description": "CI", "allowed_ips": ["10.0.0.1"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "api_key",
                "attributes": key.clone(),
                "meta": { "secret_token": "wwQ5DJ6X1XaFznQS0123456789abcdef" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/client/account/api-keys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list", "data": [{ "object": "api_key", "attributes": key }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/client/account/api-keys/wwQ5DJ6X1XaFznQS"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let created = client
            .create_api_key(&CreateApiKeyDescriptor {
                description: "CI".into(),
                allowed_ips: vec!["10.0.0.1".into()],
            })
            .await
            .unwrap();
        assert_eq!(created.key.identifier.as_str(), "wwQ5DJ6X1XaFznQS");
        assert_eq!(
            created.secret_token.as_ref().map(|s| s.expose_secret().to_string()),
            Some("wwQ5DJ6X1XaFznQS0123456789abcdef".to_string())
        );

        let keys = client.list_api_keys().await.unwrap();
        assert_eq!(keys, vec![created.key.clone()]);

        client.delete_api_key(&created.key.identifier).await.unwrap();
    }
}
