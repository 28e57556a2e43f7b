use serde::{Deserialize, Serialize};
use user_directory_sdk::UserRecord;

use crate::domain::Directory;

/// Configuration for the user directory.
///
/// `users` seeds the directory at startup. When the section is absent the
/// three sample users are loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoryConfig {
    pub users: Vec<UserRecord>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            users: Directory::sample_users(),
        }
    }
}
