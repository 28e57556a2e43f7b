//! Transport-agnostic models for the user directory.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a stored user. Valid identifiers are strictly positive.
pub type UserId = u32;

/// Marital status of a user. `Unknown` is the unset default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    #[default]
    Unknown,
    Single,
    Married,
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "UNKNOWN",
            Self::Single => "SINGLE",
            Self::Married => "MARRIED",
        })
    }
}

/// A single user's stored attributes.
///
/// `Default` yields the empty placeholder returned alongside failed lookups.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub city: String,
    pub phone: String,
    pub height: f64,
    #[serde(default)]
    pub marital_status: MaritalStatus,
}

/// Search filter. Empty strings mean "not supplied".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchCriteria {
    pub city: String,
    pub phone: String,
    pub marital_status: MaritalStatus,
}

impl SearchCriteria {
    #[must_use]
    pub fn by_city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_phone(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_marital_status(marital_status: MaritalStatus) -> Self {
        Self {
            marital_status,
            ..Self::default()
        }
    }
}

/// Outcome indicator embedded in every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
}

impl StatusCode {
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotFound => 404,
        }
    }

    #[must_use]
    pub const fn from_u32(code: u32) -> Option<Self> {
        match code {
            200 => Some(Self::Ok),
            400 => Some(Self::BadRequest),
            404 => Some(Self::NotFound),
            _ => None,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
        };
        write!(f, "{} {reason}", self.as_u32())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_http_numbers() {
        for code in [StatusCode::Ok, StatusCode::BadRequest, StatusCode::NotFound] {
            assert_eq!(StatusCode::from_u32(code.as_u32()), Some(code));
        }
        assert_eq!(StatusCode::from_u32(500), None);
        assert_eq!(StatusCode::NotFound.to_string(), "404 Not Found");
    }

    #[test]
    fn user_record_reads_from_config_shape() {
        let raw = r#"{
            "id": 7,
            "first_name": "Dana",
            "city": "San Jose",
            "phone": "4085550100",
            "height": 5.4,
            "marital_status": "SINGLE"
        }"#;
        let user: UserRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.marital_status, MaritalStatus::Single);

        let without_status: UserRecord = serde_json::from_str(
            r#"{"id":8,"first_name":"Eli","city":"NY","phone":"2125550100","height":6.0}"#,
        )
        .unwrap();
        assert_eq!(without_status.marital_status, MaritalStatus::Unknown);
    }

    #[test]
    fn placeholder_record_is_empty() {
        let placeholder = UserRecord::default();
        assert_eq!(placeholder.id, 0);
        assert!(placeholder.first_name.is_empty());
        assert_eq!(placeholder.marital_status, MaritalStatus::Unknown);
    }
}
