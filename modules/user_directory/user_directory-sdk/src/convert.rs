//! Conversions between SDK models and the generated protobuf types.

use crate::errors::{InvalidFields, SearchField, UserDirectoryError};
use crate::models::{MaritalStatus, SearchCriteria, UserRecord};
use crate::proto;

/// A wire value that does not map onto an SDK type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("unknown marital status value {0}")]
    MaritalStatus(i32),
    #[error("unknown error kind value {0}")]
    ErrorKind(i32),
    #[error("unknown search field '{0}'")]
    SearchField(String),
}

impl From<MaritalStatus> for proto::MaritalStatus {
    fn from(status: MaritalStatus) -> Self {
        match status {
            MaritalStatus::Unknown => Self::Unknown,
            MaritalStatus::Single => Self::Single,
            MaritalStatus::Married => Self::Married,
        }
    }
}

impl From<proto::MaritalStatus> for MaritalStatus {
    fn from(status: proto::MaritalStatus) -> Self {
        match status {
            proto::MaritalStatus::Unknown => Self::Unknown,
            proto::MaritalStatus::Single => Self::Single,
            proto::MaritalStatus::Married => Self::Married,
        }
    }
}

/// Decode a raw enum value, rejecting numbers outside the schema.
///
/// # Errors
/// Returns [`WireError::MaritalStatus`] for unknown values.
pub fn marital_status_from_wire(raw: i32) -> Result<MaritalStatus, WireError> {
    proto::MaritalStatus::try_from(raw)
        .map(Into::into)
        .map_err(|_| WireError::MaritalStatus(raw))
}

impl From<&UserRecord> for proto::User {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            fname: user.first_name.clone(),
            city: user.city.clone(),
            phone: user.phone.clone(),
            height: user.height,
            marital_status: proto::MaritalStatus::from(user.marital_status).into(),
        }
    }
}

impl TryFrom<proto::User> for UserRecord {
    type Error = WireError;

    fn try_from(user: proto::User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id,
            first_name: user.fname,
            city: user.city,
            phone: user.phone,
            height: user.height,
            marital_status: marital_status_from_wire(user.marital_status)?,
        })
    }
}

impl From<&SearchCriteria> for proto::SearchUsersRequest {
    fn from(criteria: &SearchCriteria) -> Self {
        Self {
            city: criteria.city.clone(),
            phone: criteria.phone.clone(),
            marital_status: proto::MaritalStatus::from(criteria.marital_status).into(),
        }
    }
}

impl TryFrom<proto::SearchUsersRequest> for SearchCriteria {
    type Error = WireError;

    fn try_from(req: proto::SearchUsersRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            marital_status: marital_status_from_wire(req.marital_status)?,
            city: req.city,
            phone: req.phone,
        })
    }
}

impl From<&UserDirectoryError> for proto::DirectoryError {
    fn from(err: &UserDirectoryError) -> Self {
        let (kind, ids, fields) = match err {
            UserDirectoryError::InvalidId { ids } => {
                (proto::ErrorKind::InvalidId, ids.clone(), Vec::new())
            }
            UserDirectoryError::UserNotFound { ids } => {
                (proto::ErrorKind::UserNotFound, ids.clone(), Vec::new())
            }
            UserDirectoryError::InvalidFields(InvalidFields::MissingCriteria) => {
                (proto::ErrorKind::InvalidFields, Vec::new(), Vec::new())
            }
            UserDirectoryError::InvalidFields(InvalidFields::Malformed(fields)) => (
                proto::ErrorKind::InvalidFields,
                Vec::new(),
                fields.iter().map(|f| f.as_str().to_owned()).collect(),
            ),
        };

        Self {
            kind: kind.into(),
            ids,
            fields,
            message: err.to_string(),
        }
    }
}

impl TryFrom<proto::DirectoryError> for UserDirectoryError {
    type Error = WireError;

    fn try_from(err: proto::DirectoryError) -> Result<Self, Self::Error> {
        let kind = proto::ErrorKind::try_from(err.kind).map_err(|_| WireError::ErrorKind(err.kind))?;
        match kind {
            proto::ErrorKind::InvalidId => Ok(Self::invalid_id(err.ids)),
            proto::ErrorKind::UserNotFound => Ok(Self::not_found(err.ids)),
            proto::ErrorKind::InvalidFields if err.fields.is_empty() => Ok(Self::missing_criteria()),
            proto::ErrorKind::InvalidFields => {
                let fields = err
                    .fields
                    .into_iter()
                    .map(|name| SearchField::parse(&name).ok_or(WireError::SearchField(name)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::malformed_fields(fields))
            }
            proto::ErrorKind::Unspecified => Err(WireError::ErrorKind(err.kind)),
        }
    }
}
