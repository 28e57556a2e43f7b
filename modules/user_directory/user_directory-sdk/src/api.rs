//! `UserDirectoryClientV1` trait and its error type.

use async_trait::async_trait;

use crate::errors::UserDirectoryError;
use crate::models::{SearchCriteria, StatusCode, UserId, UserRecord};

/// Public API of the user directory.
///
/// Implemented in-process by the module's local client and remotely by the
/// gRPC client in this crate.
#[async_trait]
pub trait UserDirectoryClientV1: Send + Sync {
    /// Fetch one user.
    async fn get_user(&self, id: UserId) -> Result<UserRecord, UserDirectoryClientError>;

    /// Fetch every listed user, in request order, or fail naming the bad ids.
    async fn list_users(&self, ids: &[UserId]) -> Result<Vec<UserRecord>, UserDirectoryClientError>;

    /// Users matching any of the supplied criteria.
    async fn search_users(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<UserRecord>, UserDirectoryClientError>;
}

/// Error returned by [`UserDirectoryClientV1`] implementations.
#[derive(thiserror::Error, Debug)]
pub enum UserDirectoryClientError {
    /// The directory answered with a domain failure.
    #[error("{status}: {source}")]
    Rejected {
        status: StatusCode,
        #[source]
        source: UserDirectoryError,
    },

    #[error("gRPC transport error: {0}")]
    Transport(String),

    /// The response could not be interpreted.
    #[error("malformed response: {0}")]
    Protocol(String),
}

impl UserDirectoryClientError {
    /// The domain error, if the call reached the directory and was rejected.
    #[must_use]
    pub fn domain(&self) -> Option<&UserDirectoryError> {
        match self {
            Self::Rejected { source, .. } => Some(source),
            Self::Transport(_) | Self::Protocol(_) => None,
        }
    }
}

impl From<UserDirectoryError> for UserDirectoryClientError {
    fn from(source: UserDirectoryError) -> Self {
        Self::Rejected {
            status: source.status_code(),
            source,
        }
    }
}
