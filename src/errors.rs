//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.
//!
//! Storage failures are classified once, at the gateway boundary, into the
//! closed [`ErrorCode`] set so callers never inspect raw SQLite codes.

use std::fmt;
use std::io;
use thiserror::Error;

/// Failure classes reported by the storage layer.
///
/// Numeric values follow the Web SQL `SQLError` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unknown,
    Database,
    Version,
    TooLarge,
    Quota,
    Syntax,
    Constraint,
    Timeout,
}

impl ErrorCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            ErrorCode::Unknown => 0,
            ErrorCode::Database => 1,
            ErrorCode::Version => 2,
            ErrorCode::TooLarge => 3,
            ErrorCode::Quota => 4,
            ErrorCode::Syntax => 5,
            ErrorCode::Constraint => 6,
            ErrorCode::Timeout => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::Database => "DATABASE",
            ErrorCode::Version => "DATABASE VERSION",
            ErrorCode::TooLarge => "RESULT TOO LARGE",
            ErrorCode::Quota => "QUOTA EXCEEDED",
            ErrorCode::Syntax => "SYNTAX",
            ErrorCode::Constraint => "CONSTRAINT",
            ErrorCode::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.as_u16(), self.name())
    }
}

/// A single statement failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("SQL statement error {code} {message}")]
pub struct StorageError {
    pub code: ErrorCode,
    pub message: String,
}

impl StorageError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::new(classify(&err), err.to_string())
    }
}

/// The transaction as a whole could not be opened or committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("SQL transaction error {code} {message}")]
pub struct TransactionError {
    pub code: ErrorCode,
    pub message: String,
}

impl TransactionError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for TransactionError {
    fn from(err: rusqlite::Error) -> Self {
        Self::new(classify(&err), err.to_string())
    }
}

/// Map a rusqlite error onto the closed [`ErrorCode`] set.
pub fn classify(err: &rusqlite::Error) -> ErrorCode {
    use rusqlite::ErrorCode as Sqlite;

    match err {
        rusqlite::Error::SqliteFailure(e, _) => match e.code {
            Sqlite::DatabaseBusy | Sqlite::DatabaseLocked => ErrorCode::Timeout,
            Sqlite::DiskFull => ErrorCode::Quota,
            Sqlite::TooBig => ErrorCode::TooLarge,
            Sqlite::ConstraintViolation => ErrorCode::Constraint,
            _ if err.to_string().contains("syntax error") => ErrorCode::Syntax,
            _ => ErrorCode::Database,
        },
        rusqlite::Error::InvalidParameterCount(_, _) => ErrorCode::Syntax,
        other if other.to_string().contains("syntax error") => ErrorCode::Syntax,
        _ => ErrorCode::Unknown,
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Transaction(#[from] TransactionError),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("Invalid value for field '{field}'")]
    Validation { field: &'static str },

    #[error("Task {0} not found")]
    NotFound(i64),

    #[error("Invalid task id: {0}")]
    InvalidId(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Storage(err.into())
    }
}

impl AppError {
    /// Storage-level code, if the error came from the store.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            AppError::Storage(e) => Some(e.code),
            AppError::Transaction(e) => Some(e.code),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_sql_error_numbering() {
        assert_eq!(ErrorCode::Unknown.as_u16(), 0);
        assert_eq!(ErrorCode::Quota.as_u16(), 4);
        assert_eq!(ErrorCode::Timeout.as_u16(), 7);
        assert_eq!(ErrorCode::Quota.to_string(), "4 [QUOTA EXCEEDED]");
    }

    #[test]
    fn parameter_count_mismatch_is_a_syntax_error() {
        let err = rusqlite::Error::InvalidParameterCount(1, 2);
        assert_eq!(classify(&err), ErrorCode::Syntax);
    }

    #[test]
    fn non_sqlite_failures_are_unknown() {
        assert_eq!(
            classify(&rusqlite::Error::QueryReturnedNoRows),
            ErrorCode::Unknown
        );
    }
}
