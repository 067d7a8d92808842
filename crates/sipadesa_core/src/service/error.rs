//! Service-level error taxonomy.
//!
//! Every variant is recoverable at the call site; callers surface a message
//! and let the user retry.

use super::credential::CredentialError;
use crate::db::DbError;
use crate::model::user::UserRole;
use crate::model::{RecordId, ValidationError};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// No account matches the username/password pair.
    InvalidCredentials,
    /// Credentials match an account still awaiting admin verification.
    PendingVerification,
    /// Registration requested a username that already exists.
    UsernameTaken(String),
    NotFound(RecordId),
    /// Activation of an area-scoped role without an area.
    AreaRequired(UserRole),
    /// An account tried to delete itself.
    SelfDeletion,
    Validation(ValidationError),
    /// The storage medium could not be read or written.
    StorageUnavailable(DbError),
    /// Persisted data does not decode into the expected shapes.
    CorruptState(String),
    /// Password hashing backend failure.
    Credential(CredentialError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::PendingVerification => {
                write!(f, "account is awaiting administrator verification")
            }
            Self::UsernameTaken(username) => write!(f, "username already taken: `{username}`"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::AreaRequired(role) => {
                write!(f, "role {} requires an assigned area", role.as_str())
            }
            Self::SelfDeletion => write!(f, "an account cannot delete itself"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::CorruptState(details) => write!(f, "corrupt stored state: {details}"),
            Self::Credential(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            Self::Credential(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Db(err) => Self::StorageUnavailable(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::InvalidData(details) => Self::CorruptState(details),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::StorageUnavailable(value)
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StorageUnavailable(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CredentialError> for ServiceError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;
    use crate::repo::RepoError;

    #[test]
    fn invalid_rows_surface_as_corrupt_state() {
        let err = ServiceError::from(RepoError::InvalidData("bad role".to_string()));
        assert!(matches!(err, ServiceError::CorruptState(ref details) if details == "bad role"));
    }

    #[test]
    fn sqlite_failures_surface_as_storage_unavailable() {
        let err = ServiceError::from(rusqlite::Error::InvalidQuery);
        assert!(matches!(err, ServiceError::StorageUnavailable(_)));
        assert!(err.to_string().starts_with("storage unavailable"));
    }
}
