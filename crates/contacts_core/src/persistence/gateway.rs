//! Gateway contract and error classification.

use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, ContactValidationError};
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure reported by a gateway implementation.
#[derive(Debug)]
pub enum GatewayError {
    /// Storage engine failure.
    Db(DbError),
    /// Stored record cannot be decoded into a valid contact.
    InvalidData(String),
    /// Backend temporarily unreachable; the write may succeed later.
    Unavailable(String),
    /// Backend refused the write permanently.
    Rejected(String),
}

impl GatewayError {
    /// Returns whether retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _))) => matches!(
                err.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored contact: {message}"),
            Self::Unavailable(message) => write!(f, "contact store unavailable: {message}"),
            Self::Rejected(message) => write!(f, "contact store rejected write: {message}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ContactValidationError> for GatewayError {
    fn from(value: ContactValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Document-style contact persistence.
///
/// Implementations treat each contact as an opaque document keyed by id.
pub trait ContactGateway {
    /// Inserts or replaces one contact document.
    fn save(&self, contact: &Contact) -> GatewayResult<()>;
    /// Loads every stored contact.
    fn load_all(&self) -> GatewayResult<Vec<Contact>>;
    /// Deletes one contact document. Deleting an unknown id succeeds.
    fn delete(&self, id: ContactId) -> GatewayResult<()>;
}
