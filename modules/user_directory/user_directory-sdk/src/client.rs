//! gRPC implementation of [`UserDirectoryClientV1`].

use async_trait::async_trait;
use tonic::transport::Channel;
use userdir_transport_grpc::{GrpcClientConfig, RpcRetryConfig, call_with_retry, connect_with_retry};

use crate::SERVICE_NAME;
use crate::api::{UserDirectoryClientError, UserDirectoryClientV1};
use crate::errors::UserDirectoryError;
use crate::models::{SearchCriteria, StatusCode, UserId, UserRecord};
use crate::proto::{self, user_service_client::UserServiceClient};

/// Remote user directory reached over gRPC.
///
/// Every call is a read-only query, so transient transport failures are
/// retried according to the configured policy.
#[derive(Clone)]
pub struct UserDirectoryGrpcClient {
    inner: UserServiceClient<Channel>,
    retry: RpcRetryConfig,
}

impl UserDirectoryGrpcClient {
    /// Connect with default transport settings.
    ///
    /// # Errors
    /// Returns an error if no connection could be established.
    pub async fn connect(uri: impl Into<String>) -> anyhow::Result<Self> {
        Self::connect_with_config(uri, &GrpcClientConfig::new(SERVICE_NAME)).await
    }

    /// Connect with explicit transport and retry settings.
    ///
    /// # Errors
    /// Returns an error if no connection could be established.
    pub async fn connect_with_config(
        uri: impl Into<String>,
        cfg: &GrpcClientConfig,
    ) -> anyhow::Result<Self> {
        let channel: Channel = connect_with_retry(uri, cfg).await?;
        Ok(Self::from_parts(UserServiceClient::new(channel), RpcRetryConfig::from(cfg)))
    }

    /// Wrap an already connected tonic client.
    #[must_use]
    pub fn from_parts(inner: UserServiceClient<Channel>, retry: RpcRetryConfig) -> Self {
        Self { inner, retry }
    }
}

fn transport(status: &tonic::Status) -> UserDirectoryClientError {
    UserDirectoryClientError::Transport(format!("{:?}: {}", status.code(), status.message()))
}

fn protocol(detail: impl std::fmt::Display) -> UserDirectoryClientError {
    UserDirectoryClientError::Protocol(detail.to_string())
}

/// Interpret the `(status_code, error)` pair shared by all responses.
fn settle(status_code: u32, error: Option<proto::DirectoryError>) -> Result<(), UserDirectoryClientError> {
    let status = StatusCode::from_u32(status_code)
        .ok_or_else(|| protocol(format!("unexpected status code {status_code}")))?;

    match (status, error) {
        (StatusCode::Ok, None) => Ok(()),
        (StatusCode::Ok, Some(_)) => Err(protocol("error attached to a 200 response")),
        (status, None) => Err(protocol(format!("{status} without error detail"))),
        (status, Some(wire)) => {
            let source = UserDirectoryError::try_from(wire).map_err(protocol)?;
            if source.status_code() != status {
                return Err(protocol(format!("{status} paired with {}", source.kind())));
            }
            Err(UserDirectoryClientError::Rejected { status, source })
        }
    }
}

fn decode_users(users: Vec<proto::User>) -> Result<Vec<UserRecord>, UserDirectoryClientError> {
    users
        .into_iter()
        .map(|u| UserRecord::try_from(u).map_err(protocol))
        .collect()
}

#[async_trait]
impl UserDirectoryClientV1 for UserDirectoryGrpcClient {
    async fn get_user(&self, id: UserId) -> Result<UserRecord, UserDirectoryClientError> {
        let mut client = self.inner.clone();
        let resp = call_with_retry(
            &mut client,
            &self.retry,
            proto::GetUserRequest { id },
            |c, r| {
                let mut c = c.clone();
                async move { c.get_user(r).await.map(tonic::Response::into_inner) }
            },
            "userdir.get_user",
        )
        .await
        .map_err(|s| transport(&s))?;

        settle(resp.status_code, resp.error)?;
        let user = resp.user.ok_or_else(|| protocol("200 response without user"))?;
        UserRecord::try_from(user).map_err(protocol)
    }

    async fn list_users(&self, ids: &[UserId]) -> Result<Vec<UserRecord>, UserDirectoryClientError> {
        let mut client = self.inner.clone();
        let resp = call_with_retry(
            &mut client,
            &self.retry,
            proto::ListUsersRequest { ids: ids.to_vec() },
            |c, r| {
                let mut c = c.clone();
                async move { c.list_users(r).await.map(tonic::Response::into_inner) }
            },
            "userdir.list_users",
        )
        .await
        .map_err(|s| transport(&s))?;

        settle(resp.status_code, resp.error)?;
        decode_users(resp.users)
    }

    async fn search_users(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<UserRecord>, UserDirectoryClientError> {
        let mut client = self.inner.clone();
        let resp = call_with_retry(
            &mut client,
            &self.retry,
            proto::SearchUsersRequest::from(criteria),
            |c, r| {
                let mut c = c.clone();
                async move { c.search_users(r).await.map(tonic::Response::into_inner) }
            },
            "userdir.search_users",
        )
        .await
        .map_err(|s| transport(&s))?;

        settle(resp.status_code, resp.error)?;
        decode_users(resp.users)
    }
}
