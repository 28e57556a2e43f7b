//! gRPC server implementation for the user directory.
//!
//! Domain failures travel in-band: the call succeeds at the gRPC level and
//! the response carries the status code and a structured error. A
//! `tonic::Status` is only returned for requests that cannot be decoded.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use user_directory_sdk::proto::{
    self, GetUserRequest, GetUserResponse, ListUsersRequest, ListUsersResponse,
    SearchUsersRequest, SearchUsersResponse,
};
use user_directory_sdk::{SearchCriteria, UserDirectoryError, UserRecord, UserService};

use crate::domain::{Service, status_for};

/// gRPC service wrapping the domain [`Service`].
#[derive(Clone)]
pub struct UserServiceImpl {
    service: Arc<Service>,
}

impl UserServiceImpl {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

fn rejection(op: &'static str, err: &UserDirectoryError) -> proto::DirectoryError {
    tracing::info!(
        op,
        kind = err.kind(),
        status = err.status_code().as_u32(),
        error = %err,
        "request rejected"
    );
    proto::DirectoryError::from(err)
}

/// Split a list result into wire users and an optional wire error.
fn users_reply(
    op: &'static str,
    result: &Result<Vec<UserRecord>, UserDirectoryError>,
) -> (Vec<proto::User>, Option<proto::DirectoryError>) {
    match result {
        Ok(users) => (users.iter().map(proto::User::from).collect(), None),
        Err(e) => (Vec::new(), Some(rejection(op, e))),
    }
}

#[tonic::async_trait]
impl UserService for UserServiceImpl {
    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>, Status> {
        let GetUserRequest { id } = request.into_inner();
        tracing::debug!(id, "GetUser");

        let result = self.service.get_user(id);
        let status_code = status_for(&result).as_u32();
        let (user, error) = match &result {
            Ok(user) => (proto::User::from(user), None),
            Err(e) => (proto::User::default(), Some(rejection("get_user", e))),
        };

        Ok(Response::new(GetUserResponse {
            status_code,
            user: Some(user),
            error,
        }))
    }

    async fn list_users(
        &self,
        request: Request<ListUsersRequest>,
    ) -> Result<Response<ListUsersResponse>, Status> {
        let ListUsersRequest { ids } = request.into_inner();
        tracing::debug!(?ids, "ListUsers");

        let result = self.service.list_users(&ids);
        let status_code = status_for(&result).as_u32();
        let (users, error) = users_reply("list_users", &result);

        Ok(Response::new(ListUsersResponse {
            status_code,
            users,
            error,
        }))
    }

    async fn search_users(
        &self,
        request: Request<SearchUsersRequest>,
    ) -> Result<Response<SearchUsersResponse>, Status> {
        let criteria = SearchCriteria::try_from(request.into_inner())
            .map_err(|e| Status::invalid_argument(e.to_string()))?;
        tracing::debug!(?criteria, "SearchUsers");

        let result = self.service.search_users(&criteria);
        let status_code = status_for(&result).as_u32();
        let (users, error) = users_reply("search_users", &result);

        Ok(Response::new(SearchUsersResponse {
            status_code,
            users,
            error,
        }))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::Directory;
    use tracing_test::traced_test;

    fn server() -> UserServiceImpl {
        let directory = Directory::new(Directory::sample_users()).unwrap();
        UserServiceImpl::new(Arc::new(Service::new(directory)))
    }

    #[tokio::test]
    async fn get_user_failure_carries_placeholder_and_error() {
        let resp = server()
            .get_user(Request::new(GetUserRequest { id: 999 }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.user, Some(proto::User::default()));
        let error = resp.error.unwrap();
        assert_eq!(error.kind, proto::ErrorKind::UserNotFound as i32);
        assert_eq!(error.ids, vec![999]);
    }

    #[tokio::test]
    async fn list_users_success_has_no_error() {
        let resp = server()
            .list_users(Request::new(ListUsersRequest { ids: vec![2, 1] }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(resp.status_code, 200);
        assert!(resp.error.is_none());
        let names: Vec<&str> = resp.users.iter().map(|u| u.fname.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Steve"]);
    }

    #[tokio::test]
    async fn search_with_unknown_enum_value_is_invalid_argument() {
        let status = server()
            .search_users(Request::new(SearchUsersRequest {
                city: String::new(),
                phone: String::new(),
                marital_status: 42,
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn search_rejection_lists_fields() {
        let resp = server()
            .search_users(Request::new(SearchUsersRequest {
                city: "Area51".to_owned(),
                phone: String::new(),
                marital_status: proto::MaritalStatus::Unknown as i32,
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(resp.status_code, 400);
        assert!(resp.users.is_empty());
        let error = resp.error.unwrap();
        assert_eq!(error.fields, vec!["city".to_owned()]);
        assert_eq!(error.message, "error: invalid field(s): city");
    }

    #[tokio::test]
    #[traced_test]
    async fn rejections_are_logged_with_kind() {
        let resp = server()
            .list_users(Request::new(ListUsersRequest { ids: vec![0] }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(resp.status_code, 400);
        assert!(logs_contain("request rejected"));
        assert!(logs_contain("invalid_id"));
    }
}
