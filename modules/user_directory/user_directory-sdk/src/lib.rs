//! User Directory SDK
//!
//! Everything needed to talk to the user directory:
//! - models ([`UserRecord`], [`MaritalStatus`], [`SearchCriteria`], [`StatusCode`])
//! - the error taxonomy ([`UserDirectoryError`])
//! - the [`UserDirectoryClientV1`] trait and its gRPC implementation
//! - generated proto stubs, used by the server side
//!
//! ```ignore
//! use user_directory_sdk::{UserDirectoryClientV1, UserDirectoryGrpcClient};
//!
//! let client = UserDirectoryGrpcClient::connect("http://127.0.0.1:33001").await?;
//! let steve = client.get_user(1).await?;
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

mod api;
mod client;
pub mod convert;
pub mod errors;
pub mod models;

pub use api::{UserDirectoryClientError, UserDirectoryClientV1};
pub use client::UserDirectoryGrpcClient;
pub use errors::{InvalidFields, SearchField, UserDirectoryError};
pub use models::{MaritalStatus, SearchCriteria, StatusCode, UserId, UserRecord};

/// Generated protobuf types for `userdir.v1`.
pub mod proto {
    #![allow(clippy::all, clippy::pedantic)]
    tonic::include_proto!("userdir.v1");
}

pub use proto::user_service_server::{UserService, UserServiceServer};

/// Fully qualified gRPC service name.
pub const SERVICE_NAME: &str = "userdir.v1.UserService";
