//! Directory service: the three query operations.
//!
//! Every operation holds the directory lock for its whole body. Reads are
//! serialized, which keeps results linearizable if mutation is ever added.
//! Nothing awaits or blocks on I/O while the guard is alive.

use parking_lot::Mutex;
use tracing::debug;
use user_directory_sdk::{SearchCriteria, StatusCode, UserDirectoryError, UserId, UserRecord};

use super::directory::Directory;
use super::validation::{is_identifier_valid, partition_invalid_identifiers, validate_criteria};

/// Status code for an operation result: 200 on success, else the error's code.
#[must_use]
pub fn status_for<T>(result: &Result<T, UserDirectoryError>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::Ok,
        Err(e) => e.status_code(),
    }
}

/// Owns the directory and answers queries against it.
#[derive(Debug)]
pub struct Service {
    directory: Mutex<Directory>,
}

impl Service {
    #[must_use]
    pub fn new(directory: Directory) -> Self {
        Self {
            directory: Mutex::new(directory),
        }
    }

    /// Look up one user.
    ///
    /// # Errors
    /// - `InvalidId([id])` if `id` is 0
    /// - `UserNotFound([id])` if nothing is stored under `id`
    pub fn get_user(&self, id: UserId) -> Result<UserRecord, UserDirectoryError> {
        let directory = self.directory.lock();
        debug!(id, "getting user");

        if !is_identifier_valid(id) {
            return Err(UserDirectoryError::invalid_id(vec![id]));
        }

        directory
            .get(id)
            .cloned()
            .ok_or_else(|| UserDirectoryError::not_found(vec![id]))
    }

    /// Look up every listed user, all or nothing.
    ///
    /// # Errors
    /// - `InvalidId` with every non-positive id, in input order
    /// - `UserNotFound` with every missing id, in input order; no partial list
    ///   is returned
    pub fn list_users(&self, ids: &[UserId]) -> Result<Vec<UserRecord>, UserDirectoryError> {
        let directory = self.directory.lock();
        debug!(count = ids.len(), "listing users");

        let invalid = partition_invalid_identifiers(ids);
        if !invalid.is_empty() {
            return Err(UserDirectoryError::invalid_id(invalid));
        }

        let mut found = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for &id in ids {
            match directory.get(id) {
                Some(user) => found.push(user.clone()),
                None => missing.push(id),
            }
        }

        if missing.is_empty() {
            Ok(found)
        } else {
            Err(UserDirectoryError::not_found(missing))
        }
    }

    /// Users matching ANY supplied criterion.
    ///
    /// A record matches when the city is given and equal ignoring case, when
    /// the phone is given and equal, or when its marital status equals the
    /// requested one. The last test applies even for `Unknown`.
    ///
    /// # Errors
    /// - `InvalidFields` from criteria validation, unchanged
    /// - `UserNotFound` with no ids when nothing matches
    pub fn search_users(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<UserRecord>, UserDirectoryError> {
        let directory = self.directory.lock();
        debug!(
            city = %criteria.city,
            phone = %criteria.phone,
            marital_status = %criteria.marital_status,
            "searching users"
        );

        validate_criteria(criteria)?;

        let matches: Vec<UserRecord> = directory
            .iter()
            .filter(|user| matches_any(user, criteria))
            .cloned()
            .collect();

        if matches.is_empty() {
            Err(UserDirectoryError::not_found(Vec::new()))
        } else {
            Ok(matches)
        }
    }
}

fn matches_any(user: &UserRecord, criteria: &SearchCriteria) -> bool {
    (!criteria.city.is_empty() && user.city.eq_ignore_ascii_case(&criteria.city))
        || (!criteria.phone.is_empty() && user.phone == criteria.phone)
        || user.marital_status == criteria.marital_status
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use user_directory_sdk::{MaritalStatus, SearchField};

    fn service() -> Service {
        Service::new(Directory::new(Directory::sample_users()).unwrap())
    }

    fn ids(users: &[UserRecord]) -> Vec<UserId> {
        users.iter().map(|u| u.id).collect()
    }

    #[test]
    fn get_user_returns_exact_record() {
        let res = service().get_user(1);
        assert_eq!(status_for(&res), StatusCode::Ok);
        assert_eq!(
            res.unwrap(),
            UserRecord {
                id: 1,
                first_name: "Steve".to_owned(),
                city: "LA".to_owned(),
                phone: "9827329211".to_owned(),
                height: 5.8,
                marital_status: MaritalStatus::Married,
            }
        );
    }

    #[test]
    fn get_user_rejects_zero() {
        let res = service().get_user(0);
        assert_eq!(status_for(&res), StatusCode::BadRequest);
        assert_eq!(res, Err(UserDirectoryError::invalid_id(vec![0])));
    }

    #[test]
    fn get_user_reports_missing_id() {
        let svc = service();
        for id in [4, 999, u32::MAX] {
            let res = svc.get_user(id);
            assert_eq!(status_for(&res), StatusCode::NotFound);
            assert_eq!(res, Err(UserDirectoryError::not_found(vec![id])));
        }
    }

    #[test]
    fn list_users_keeps_request_order() {
        let svc = service();
        assert_eq!(ids(&svc.list_users(&[1, 2]).unwrap()), vec![1, 2]);
        assert_eq!(ids(&svc.list_users(&[3, 1, 3]).unwrap()), vec![3, 1, 3]);
    }

    #[test]
    fn list_users_never_returns_partial_results() {
        let res = service().list_users(&[1, 999]);
        assert_eq!(status_for(&res), StatusCode::NotFound);
        assert_eq!(res, Err(UserDirectoryError::not_found(vec![999])));
    }

    #[test]
    fn list_users_reports_every_missing_id() {
        assert_eq!(
            service().list_users(&[8, 1, 5]),
            Err(UserDirectoryError::not_found(vec![8, 5]))
        );
    }

    #[test]
    fn list_users_checks_validity_before_presence() {
        let res = service().list_users(&[0]);
        assert_eq!(status_for(&res), StatusCode::BadRequest);
        assert_eq!(res, Err(UserDirectoryError::invalid_id(vec![0])));

        assert_eq!(
            service().list_users(&[999, 0, 1]),
            Err(UserDirectoryError::invalid_id(vec![0]))
        );
    }

    #[test]
    fn list_users_with_no_ids_is_empty_success() {
        assert_eq!(service().list_users(&[]), Ok(Vec::new()));
    }

    #[test]
    fn search_by_city_ignores_case() {
        let svc = service();
        assert_eq!(ids(&svc.search_users(&SearchCriteria::by_city("LA")).unwrap()), vec![1, 3]);
        assert_eq!(ids(&svc.search_users(&SearchCriteria::by_city("ny")).unwrap()), vec![2]);
    }

    #[test]
    fn search_by_phone_is_exact() {
        let res = service().search_users(&SearchCriteria::by_phone("9876543210"));
        assert_eq!(ids(&res.unwrap()), vec![2]);
    }

    #[test]
    fn search_by_marital_status() {
        let svc = service();
        let married = svc.search_users(&SearchCriteria::by_marital_status(MaritalStatus::Married));
        assert_eq!(ids(&married.unwrap()), vec![1, 3]);
        let single = svc.search_users(&SearchCriteria::by_marital_status(MaritalStatus::Single));
        assert_eq!(ids(&single.unwrap()), vec![2]);
    }

    #[test]
    fn search_criteria_are_disjunctive() {
        let criteria = SearchCriteria {
            city: "NY".to_owned(),
            phone: "9876545876".to_owned(),
            marital_status: MaritalStatus::Unknown,
        };
        assert_eq!(ids(&service().search_users(&criteria).unwrap()), vec![2, 3]);
    }

    #[test]
    fn unknown_status_matches_unknown_records() {
        let mut users = Directory::sample_users();
        users[1].marital_status = MaritalStatus::Unknown;
        let svc = Service::new(Directory::new(users).unwrap());

        let res = svc.search_users(&SearchCriteria::by_city("Nowhere"));
        assert_eq!(ids(&res.unwrap()), vec![2]);
    }

    #[test]
    fn search_without_criteria_is_bad_request() {
        let res = service().search_users(&SearchCriteria::default());
        assert_eq!(status_for(&res), StatusCode::BadRequest);
        assert_eq!(res, Err(UserDirectoryError::missing_criteria()));
    }

    #[test]
    fn search_with_malformed_fields_is_bad_request() {
        let criteria = SearchCriteria {
            city: "InvalidCity".to_owned(),
            phone: "0123456789".to_owned(),
            marital_status: MaritalStatus::Unknown,
        };
        assert_eq!(
            service().search_users(&criteria),
            Err(UserDirectoryError::malformed_fields(vec![SearchField::Phone]))
        );
    }

    #[test]
    fn search_with_non_ascii_digits_is_bad_request() {
        let criteria =
            SearchCriteria::by_phone("1\u{0661}\u{0662}\u{0663}\u{0664}\u{0665}\u{0666}\u{0667}\u{0668}\u{0669}");
        let res = service().search_users(&criteria);
        assert_eq!(status_for(&res), StatusCode::BadRequest);
        assert_eq!(
            res,
            Err(UserDirectoryError::malformed_fields(vec![SearchField::Phone]))
        );

        let res = service().search_users(&SearchCriteria::by_city("New\u{00A0}York"));
        assert_eq!(
            res,
            Err(UserDirectoryError::malformed_fields(vec![SearchField::City]))
        );
    }

    #[test]
    fn search_without_matches_is_not_found() {
        let res = service().search_users(&SearchCriteria::by_city("Unknown-City-With-No-Match"));
        assert_eq!(status_for(&res), StatusCode::NotFound);
        assert_eq!(res, Err(UserDirectoryError::not_found(Vec::new())));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let svc = service();
        let criteria = SearchCriteria::by_city("LA");
        assert_eq!(svc.get_user(1), svc.get_user(1));
        assert_eq!(svc.list_users(&[1, 999]), svc.list_users(&[1, 999]));
        assert_eq!(svc.search_users(&criteria), svc.search_users(&criteria));
    }
}
