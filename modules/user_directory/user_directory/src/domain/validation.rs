//! Input validation for directory queries.
//!
//! Pure functions only; safe to call from any thread and usable by callers
//! that want to reject a request before dispatching it.

use std::sync::LazyLock;

use regex::Regex;
use user_directory_sdk::{MaritalStatus, SearchCriteria, SearchField, UserDirectoryError, UserId};

#[allow(clippy::expect_used)] // literal pattern, compiled once
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{9}$").expect("static regex should not panic"));

#[allow(clippy::expect_used)] // literal pattern, compiled once
static CITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]+(?:[\t\n\x0C\r -][a-zA-Z]+)*$").expect("static regex should not panic")
});

#[must_use]
pub const fn is_identifier_valid(id: UserId) -> bool {
    id > 0
}

/// Identifiers failing [`is_identifier_valid`], in input order.
#[must_use]
pub fn partition_invalid_identifiers(ids: &[UserId]) -> Vec<UserId> {
    ids.iter()
        .copied()
        .filter(|&id| !is_identifier_valid(id))
        .collect()
}

/// Ten ASCII digits, first one non-zero.
#[must_use]
pub fn is_phone_valid(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// ASCII letter words joined by a single ASCII whitespace character or hyphen.
#[must_use]
pub fn is_city_valid(city: &str) -> bool {
    CITY_RE.is_match(city)
}

/// Check that a search names at least one criterion and that every supplied
/// string field is well formed.
///
/// # Errors
/// - `InvalidFields(MissingCriteria)` when city and phone are empty and the
///   marital status is `Unknown`.
/// - `InvalidFields(Malformed(..))` listing bad fields in `[city, phone]` order.
pub fn validate_search_criteria(
    city: &str,
    phone: &str,
    marital_status: MaritalStatus,
) -> Result<(), UserDirectoryError> {
    if city.is_empty() && phone.is_empty() {
        return if marital_status == MaritalStatus::Unknown {
            Err(UserDirectoryError::missing_criteria())
        } else {
            Ok(())
        };
    }

    let mut invalid = Vec::new();
    if !city.is_empty() && !is_city_valid(city) {
        invalid.push(SearchField::City);
    }
    if !phone.is_empty() && !is_phone_valid(phone) {
        invalid.push(SearchField::Phone);
    }

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(UserDirectoryError::malformed_fields(invalid))
    }
}

/// [`validate_search_criteria`] over a [`SearchCriteria`] value.
///
/// # Errors
/// See [`validate_search_criteria`].
pub fn validate_criteria(criteria: &SearchCriteria) -> Result<(), UserDirectoryError> {
    validate_search_criteria(&criteria.city, &criteria.phone, criteria.marital_status)
}
