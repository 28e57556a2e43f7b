//! Wiring: builds the service from configuration and exposes it to the
//! transport and to in-process consumers.

use std::sync::Arc;

use user_directory_sdk::{UserDirectoryClientV1, UserServiceServer};

use crate::api::grpc::UserServiceImpl;
use crate::config::DirectoryConfig;
use crate::domain::{Directory, DirectoryBuildError, Service};
use crate::local_client::UserDirectoryLocalClient;

/// The user directory module.
#[derive(Clone)]
pub struct UserDirectoryModule {
    service: Arc<Service>,
}

impl UserDirectoryModule {
    /// Seed the directory from `cfg`.
    ///
    /// # Errors
    /// Returns [`DirectoryBuildError`] if a seed user has id 0, a malformed
    /// phone or a repeated id.
    pub fn from_config(cfg: &DirectoryConfig) -> Result<Self, DirectoryBuildError> {
        let directory = Directory::new(cfg.users.iter().cloned())?;
        tracing::info!(users = directory.len(), "user directory initialized");
        Ok(Self {
            service: Arc::new(Service::new(directory)),
        })
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    /// tonic service ready to be added to a `Server` router.
    #[must_use]
    pub fn grpc_service(&self) -> UserServiceServer<UserServiceImpl> {
        UserServiceServer::new(UserServiceImpl::new(self.service()))
    }

    #[must_use]
    pub fn local_client(&self) -> Arc<dyn UserDirectoryClientV1> {
        Arc::new(UserDirectoryLocalClient::new(self.service()))
    }
}
