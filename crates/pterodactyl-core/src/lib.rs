//! # pterodactyl-core
//!
//! Core types and plumbing shared by the Pterodactyl panel API clients.
//!
//! This crate holds everything the application and client API crates have in common:
//! configuration, authenticated request construction, the transport seam, the response
//! envelope codec and the pagination walker.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and the panel's structured error list
//! - [`ids`] - Strongly-typed ids for panel resources
//! - [`types`] - API scopes, `Accept` variants, [`types::Nullable`] and shared limit blocks
//! - [`config`] - Panel configuration and validation
//! - [`request`] - Request construction and bearer authentication
//! - [`transport`] - The [`transport::Transport`] seam and its `reqwest` implementation
//! - [`envelope`] - Decoding of resource, collection and error envelopes
//! - [`pagination`] - Walking every page of a collection
//! - [`query`] - Query parameter builder
//! - [`client`] - HTTP settings and the shared [`client::PanelClient`]

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod pagination;
pub mod query;
pub mod request;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::{ClientConfig, PanelClient};
pub use config::PanelConfig;
pub use envelope::{Item, RelationshipList};
pub use error::{Error, PanelError, PanelErrors, Result};
pub use pagination::{Page, Pagination};
pub use query::QueryParams;
pub use request::{PanelRequest, RequestBody};
pub use transport::{PanelResponse, ReqwestTransport, Transport};
pub use types::{AcceptHeader, ApiScope, FeatureLimits, Limits, Nullable};
