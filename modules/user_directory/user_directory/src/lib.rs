#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! User Directory Module
//!
//! A fixed, in-memory directory of users with three read-only queries:
//! get by id, list by ids and search by city, phone or marital status.
//!
//! ## Architecture
//!
//! - `domain/validation.rs` - pure input validation
//! - `domain/directory.rs` - the id-keyed record store
//! - `domain/service.rs` - query evaluation behind a single lock
//! - `api/grpc/server.rs` - gRPC server implementation
//! - `module.rs` - construction from configuration
//!
//! Remote consumers should use `user_directory-sdk`, which provides the
//! models, errors and a gRPC client.

// === MODULE DEFINITION ===
mod module;
pub use module::UserDirectoryModule;

pub mod config;
pub use config::DirectoryConfig;

mod local_client;
pub use local_client::UserDirectoryLocalClient;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
