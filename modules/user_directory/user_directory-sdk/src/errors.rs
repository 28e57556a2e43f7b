//! Public error types for the user directory.
//!
//! Every variant carries its offending values as data so callers can branch
//! on the kind without parsing messages. Each maps to one [`StatusCode`].

use std::fmt;

use thiserror::Error;

use crate::models::{StatusCode, UserId};

/// A search field that can fail format validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    City,
    Phone,
}

impl SearchField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Phone => "phone",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "city" => Some(Self::City),
            "phone" => Some(Self::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a search request was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidFields {
    /// City, phone and marital status were all left unset.
    MissingCriteria,
    /// Supplied fields that failed their format rule, in `[city, phone]` order.
    Malformed(Vec<SearchField>),
}

impl fmt::Display for InvalidFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCriteria => {
                f.write_str("either city, phone or marital status must be provided")
            }
            Self::Malformed(fields) => {
                let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}

fn not_found_detail(ids: &[UserId]) -> String {
    if ids.is_empty() {
        String::new()
    } else {
        format!(": {ids:?}")
    }
}

/// Errors returned by directory operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserDirectoryError {
    /// One or more identifiers are not positive.
    #[error("error: invalid ID(s): {ids:?}")]
    InvalidId { ids: Vec<UserId> },

    /// Requested identifiers had no record. Empty `ids` means a search matched nothing.
    #[error("error: ID not found{}", not_found_detail(.ids))]
    UserNotFound { ids: Vec<UserId> },

    /// Search criteria were absent or malformed.
    #[error("error: invalid field(s): {0}")]
    InvalidFields(InvalidFields),
}

impl UserDirectoryError {
    #[must_use]
    pub fn invalid_id(ids: Vec<UserId>) -> Self {
        Self::InvalidId { ids }
    }

    #[must_use]
    pub fn not_found(ids: Vec<UserId>) -> Self {
        Self::UserNotFound { ids }
    }

    #[must_use]
    pub fn missing_criteria() -> Self {
        Self::InvalidFields(InvalidFields::MissingCriteria)
    }

    #[must_use]
    pub fn malformed_fields(fields: Vec<SearchField>) -> Self {
        Self::InvalidFields(InvalidFields::Malformed(fields))
    }

    /// Status code paired with this error in every response.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidId { .. } | Self::InvalidFields(_) => StatusCode::BadRequest,
            Self::UserNotFound { .. } => StatusCode::NotFound,
        }
    }

    /// Short machine-friendly name, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidId { .. } => "invalid_id",
            Self::UserNotFound { .. } => "user_not_found",
            Self::InvalidFields(_) => "invalid_fields",
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        assert_eq!(
            UserDirectoryError::invalid_id(vec![0]).to_string(),
            "error: invalid ID(s): [0]"
        );
        assert_eq!(
            UserDirectoryError::not_found(vec![999]).to_string(),
            "error: ID not found: [999]"
        );
        assert_eq!(
            UserDirectoryError::not_found(vec![]).to_string(),
            "error: ID not found"
        );
        assert_eq!(
            UserDirectoryError::malformed_fields(vec![SearchField::City, SearchField::Phone])
                .to_string(),
            "error: invalid field(s): city, phone"
        );
        assert_eq!(
            UserDirectoryError::missing_criteria().to_string(),
            "error: invalid field(s): either city, phone or marital status must be provided"
        );
    }

    #[test]
    fn each_kind_maps_to_one_status() {
        assert_eq!(
            UserDirectoryError::invalid_id(vec![0]).status_code(),
            StatusCode::BadRequest
        );
        assert_eq!(
            UserDirectoryError::missing_criteria().status_code(),
            StatusCode::BadRequest
        );
        assert_eq!(
            UserDirectoryError::not_found(vec![4]).status_code(),
            StatusCode::NotFound
        );
    }

    #[test]
    fn search_field_names_parse_back() {
        for field in [SearchField::City, SearchField::Phone] {
            assert_eq!(SearchField::parse(field.as_str()), Some(field));
        }
        assert_eq!(SearchField::parse("height"), None);
    }
}
