//! Application API client and data models for the Pterodactyl panel.
//!
//! Provides typed structures and an asynchronous client for the administrative
//! `/api/application` surface: locations, nodes and their allocations, servers, users,
//! nests and eggs.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{ApplicationApi, ApplicationApiBuilder};
pub use models::{
    Allocation, CreateAllocationsDescriptor, CreateLocationDescriptor, CreateNodeDescriptor,
    CreateServerDescriptor, CreateUserDescriptor, DeployableNodesDescriptor, Egg, EggVariable,
    Location, Nest, Node, NodeConfiguration, Server, ServerAllocationDescriptor,
    ServerBuildDescriptor, ServerDetailsDescriptor, ServerStartupDescriptor,
    UpdateLocationDescriptor, UpdateNodeDescriptor, UpdateUserDescriptor, User,
};

/// Convenient result alias that reuses the shared panel error type.
pub type Result<T> = pterodactyl_core::Result<T>;
