//! Client API client and data models for the Pterodactyl panel.
//!
//! Covers the end-user `/api/client` surface: the servers a token can reach, their
//! console, power state, databases and files, plus the token owner's account and API
//! keys. File transfers go through short-lived signed URLs, see [`transfer`].

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod transfer;

pub use client::{ClientApi, ClientApiBuilder};
pub use models::{
    Account, ApiKey, ChmodDescriptor, ChmodFile, ClientDatabase, ClientServer,
    CompressDescriptor, CreateApiKeyDescriptor, CreateDatabaseDescriptor, CreateFolderDescriptor,
    CreatedApiKey, DecompressDescriptor, DeleteFilesDescriptor, File, PowerSignal,
    PullDescriptor, RenameDescriptor, RenameFile, Resources, SftpDetails, Stats, WebSocketAuth,
};
pub use transfer::{Downloader, Uploader};

/// Convenient result alias that reuses the shared panel error type.
pub type Result<T> = pterodactyl_core::Result<T>;
