//! The in-memory directory: an id-keyed map fixed at construction.

use std::collections::BTreeMap;

use thiserror::Error;
use user_directory_sdk::{MaritalStatus, UserId, UserRecord};

use super::validation::{is_identifier_valid, is_phone_valid};

/// Rejected seed data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryBuildError {
    #[error("user '{first_name}' has invalid id 0")]
    InvalidId { first_name: String },

    #[error("duplicate user id {id}")]
    DuplicateId { id: UserId },

    #[error("user {id} has malformed phone '{phone}'")]
    InvalidPhone { id: UserId, phone: String },
}

/// Mapping from identifier to record.
///
/// Iteration follows ascending id. Search results inherit that order, but
/// callers must not rely on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    users: BTreeMap<UserId, UserRecord>,
}

impl Directory {
    /// Build a directory from seed records.
    ///
    /// # Errors
    /// Fails on the first record with id 0, a malformed phone or an id seen
    /// before.
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Result<Self, DirectoryBuildError> {
        let mut map = BTreeMap::new();
        for user in users {
            if !is_identifier_valid(user.id) {
                return Err(DirectoryBuildError::InvalidId {
                    first_name: user.first_name,
                });
            }
            let id = user.id;
            if !is_phone_valid(&user.phone) {
                return Err(DirectoryBuildError::InvalidPhone {
                    id,
                    phone: user.phone,
                });
            }
            if map.insert(id, user).is_some() {
                return Err(DirectoryBuildError::DuplicateId { id });
            }
        }
        Ok(Self { users: map })
    }

    /// The three placeholder users the service starts with by default.
    #[must_use]
    pub fn sample_users() -> Vec<UserRecord> {
        let user = |id, first_name: &str, city: &str, phone: &str, height, marital_status| UserRecord {
            id,
            first_name: first_name.to_owned(),
            city: city.to_owned(),
            phone: phone.to_owned(),
            height,
            marital_status,
        };
        vec![
            user(1, "Steve", "LA", "9827329211", 5.8, MaritalStatus::Married),
            user(2, "Bob", "NY", "9876543210", 6.1, MaritalStatus::Single),
            user(3, "Alice", "LA", "9876545876", 5.5, MaritalStatus::Married),
        ]
    }

    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&UserRecord> {
        self.users.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn sample_directory_holds_three_users() {
        let dir = Directory::new(Directory::sample_users()).unwrap();
        assert_eq!(dir.len(), 3);
        assert_eq!(dir.get(2).map(|u| u.first_name.as_str()), Some("Bob"));
        assert!(dir.get(4).is_none());
        assert_eq!(dir.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn zero_id_is_rejected() {
        let mut users = Directory::sample_users();
        users[1].id = 0;
        assert_eq!(
            Directory::new(users),
            Err(DirectoryBuildError::InvalidId {
                first_name: "Bob".to_owned()
            })
        );
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut users = Directory::sample_users();
        users[2].id = 1;
        assert_eq!(
            Directory::new(users),
            Err(DirectoryBuildError::DuplicateId { id: 1 })
        );
    }

    #[test]
    fn malformed_seed_phone_is_rejected() {
        let mut users = Directory::sample_users();
        users[0].phone = "abc".to_owned();
        assert_eq!(
            Directory::new(users),
            Err(DirectoryBuildError::InvalidPhone {
                id: 1,
                phone: "abc".to_owned()
            })
        );
    }

    #[test]
    fn empty_directory_is_allowed() {
        let dir = Directory::new(Vec::new()).unwrap();
        assert!(dir.is_empty());
    }
}
