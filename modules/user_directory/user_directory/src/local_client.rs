//! In-process implementation of `UserDirectoryClientV1`.

use std::sync::Arc;

use async_trait::async_trait;
use user_directory_sdk::{
    SearchCriteria, UserDirectoryClientError, UserDirectoryClientV1, UserId, UserRecord,
};

use crate::domain::Service;

/// Calls the domain service directly, without a network hop.
#[derive(Clone)]
pub struct UserDirectoryLocalClient {
    service: Arc<Service>,
}

impl UserDirectoryLocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UserDirectoryClientV1 for UserDirectoryLocalClient {
    async fn get_user(&self, id: UserId) -> Result<UserRecord, UserDirectoryClientError> {
        Ok(self.service.get_user(id)?)
    }

    async fn list_users(&self, ids: &[UserId]) -> Result<Vec<UserRecord>, UserDirectoryClientError> {
        Ok(self.service.list_users(ids)?)
    }

    async fn search_users(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<UserRecord>, UserDirectoryClientError> {
        Ok(self.service.search_users(criteria)?)
    }
}
