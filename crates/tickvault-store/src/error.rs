//! Write failure classification.

use thiserror::Error;

/// Errors that can occur while materializing a table.
///
/// The set is closed: every backend failure maps to exactly one variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// A cell cannot be represented in the destination column type.
    #[error("Cannot convert value in column '{column}': {reason}")]
    ValueConversion {
        /// Column holding the offending value.
        column: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The destination could not be opened or reached.
    #[error("Destination unreachable: {0}")]
    Connectivity(String),

    /// A relation with the destination name already exists.
    #[error("Table '{0}' already exists")]
    NameConflict(String),

    /// The destination refused the write.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Any other failure reported by the storage engine.
    #[error("Storage engine error: {0}")]
    Engine(String),
}

impl WriteError {
    /// Returns a stable snake_case tag for the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ValueConversion { .. } => "value_conversion",
            Self::Connectivity(_) => "connectivity",
            Self::NameConflict(_) => "name_conflict",
            Self::Permission(_) => "permission",
            Self::Engine(_) => "engine",
        }
    }
}

impl From<rusqlite::Error> for WriteError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match &err {
            rusqlite::Error::SqliteFailure(failure, message) => {
                let detail = message.clone().unwrap_or_else(|| err.to_string());
                match failure.code {
                    ErrorCode::CannotOpen
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::NotADatabase
                    | ErrorCode::DatabaseCorrupt => Self::Connectivity(detail),
                    ErrorCode::ReadOnly
                    | ErrorCode::PermissionDenied
                    | ErrorCode::AuthorizationForStatementDenied => Self::Permission(detail),
                    ErrorCode::TooBig | ErrorCode::TypeMismatch => Self::ValueConversion {
                        column: String::new(),
                        reason: detail,
                    },
                    _ if detail.contains("already exists") => Self::NameConflict(detail),
                    _ => Self::Engine(detail),
                }
            }
            rusqlite::Error::ToSqlConversionFailure(reason) => Self::ValueConversion {
                column: String::new(),
                reason: reason.to_string(),
            },
            rusqlite::Error::InvalidPath(path) => {
                Self::Connectivity(format!("invalid path {}", path.display()))
            }
            _ => Self::Engine(err.to_string()),
        }
    }
}
