//! Storage endpoint collaborator
//!
//! This module is organized into submodules:
//! - `types`: the transport trait and endpoint payloads
//! - `client`: the reqwest-backed client
//! - `list`: model catalog operations
//! - `objects`: object download and upload
//! - `presigned`: pre-signed upload URL resolution

mod client;
mod list;
mod objects;
mod presigned;
mod types;

pub use client::HttpStorage;
pub use types::{ByteProgress, ListResponse, PresignedUrlResponse, StorageTransport};
