//! Signed-URL file transfers.
//!
//! The panel hands out short-lived URLs pointing straight at the daemon. Requests to those
//! URLs go through the same [`Transport`] as API calls but carry no `Authorization`
//! header; the URL itself is the credential.

use bytes::Bytes;
use pterodactyl_core::request::{PanelRequest, RequestBody};
use pterodactyl_core::transport::{PanelResponse, Transport};
use pterodactyl_core::Error;
use reqwest::{Method, StatusCode};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};
use url::Url;

use crate::Result;

/// Multipart field the daemon reads uploaded files from.
const UPLOAD_FIELD: &str = "files";

/// Fetches one server file from a signed download URL.
#[derive(Clone)]
pub struct Downloader {
    transport: Arc<dyn Transport>,
    url: Url,
    /// Base name of the remote file.
    pub name: String,
    /// Local destination: a file path, or a directory to place `name` in.
    pub path: PathBuf,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("host", &self.url.host_str())
            .field("name", &self.name)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Downloader {
    pub(crate) fn new(transport: Arc<dyn Transport>, url: Url, name: String) -> Self {
        let path = PathBuf::from(&name);
        Self {
            transport,
            url,
            name,
            path,
        }
    }

    /// Write to `path` instead of `name` in the working directory.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// The signed URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Where [`Downloader::execute`] will write: `path/name` when `path` is an existing
    /// directory, `path` otherwise.
    pub async fn destination(&self) -> PathBuf {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_dir() => self.path.join(&self.name),
            _ => self.path.clone(),
        }
    }

    /// Download the file and write it to [`Downloader::destination`].
    ///
    /// Returns the path that was written.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if something already exists at the destination
    /// - [`Error::UnexpectedStatus`] if the daemon does not answer `200 OK`
    /// - transport errors unchanged, [`Error::Io`] for local write failures
    pub async fn execute(&self) -> Result<PathBuf> {
        let destination = self.destination().await;
        if tokio::fs::symlink_metadata(&destination).await.is_ok() {
            return Err(refuse_overwrite());
        }

        debug!(host = ?self.url.host_str(), name = %self.name, "downloading server file");
        let request = PanelRequest::unauthenticated(Method::GET, self.url.clone(), RequestBody::Empty);
        let response = self.transport.execute(request).await?;
        let body = expect_ok(response)?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&destination)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::AlreadyExists => refuse_overwrite(),
                _ => Error::from(err),
            })?;
        write_or_discard(file, &body, &destination).await?;

        Ok(destination)
    }
}

/// Sends one local file to a signed upload URL.
#[derive(Clone)]
pub struct Uploader {
    transport: Arc<dyn Transport>,
    url: Url,
    /// Local file to send.
    pub path: PathBuf,
}

impl fmt::Debug for Uploader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uploader")
            .field("host", &self.url.host_str())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Uploader {
    pub(crate) fn new(transport: Arc<dyn Transport>, url: Url, path: PathBuf) -> Self {
        Self {
            transport,
            url,
            path,
        }
    }

    /// Upload a different local file.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// The signed URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Read the local file and post it as multipart form data.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if no path is set, the path does not exist or is a directory
    /// - [`Error::UnexpectedStatus`] if the daemon does not answer `200 OK`
    /// - transport errors unchanged, [`Error::Io`] for local read failures
    pub async fn execute(&self) -> Result<()> {
        let data = read_upload(&self.path).await?;
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(host = ?self.url.host_str(), file = %file_name, size = data.len(), "uploading server file");
        let body = RequestBody::Multipart {
            field: UPLOAD_FIELD.to_string(),
            file_name,
            data,
        };
        let request = PanelRequest::unauthenticated(Method::POST, self.url.clone(), body);
        let response = self.transport.execute(request).await?;
        expect_ok(response).map(|_| ())
    }
}

/// Write `body` to a freshly created file, removing the file again if the write fails so
/// a retry does not hit the overwrite guard.
async fn write_or_discard<W>(mut writer: W, body: &[u8], destination: &Path) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = writer.write_all(body).await;
    if written.is_ok() {
        written = writer.flush().await;
    }
    drop(writer);

    if let Err(err) = written {
        if let Err(cleanup) = tokio::fs::remove_file(destination).await {
            warn!(path = %destination.display(), error = %cleanup, "failed to remove partial download");
        }
        return Err(err.into());
    }
    Ok(())
}

async fn read_upload(path: &Path) -> Result<Bytes> {
    if path.as_os_str().is_empty() {
        return Err(Error::Validation("no file path has been specified".to_string()));
    }

    let meta = tokio::fs::metadata(path).await.map_err(|err| match err.kind() {
        ErrorKind::NotFound => Error::Validation("file path does not exist".to_string()),
        _ => Error::from(err),
    })?;
    if meta.is_dir() {
        return Err(Error::Validation(
            "path must go to a file not a directory".to_string(),
        ));
    }

    Ok(Bytes::from(tokio::fs::read(path).await?))
}

fn refuse_overwrite() -> Error {
    Error::Validation("refusing to overwrite existing file path".to_string())
}

fn expect_ok(response: PanelResponse) -> Result<Bytes> {
    if response.status == StatusCode::OK {
        return Ok(response.body);
    }
    Err(Error::UnexpectedStatus {
        status: response.status.as_u16(),
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}

/// Parse a signed URL returned by the panel.
pub(crate) fn signed_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|err| Error::Decode(format!("invalid signed URL: {err}")))
}
