use std::fmt::{self, Display};
use thiserror::Error;

/// Outcomes that callers are expected to match on.
///
/// They travel inside [`crate::Error`], use `error.downcast_ref::<JdbError>()` to inspect them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JdbError {
    #[error("jdb: read-only mode")]
    ReadOnlyMode,
    #[error("jdb: id not found")]
    IdNotFound,
    #[error("jdb: not found")]
    NotFound,
    #[error("jdb: invalid table name")]
    InvalidTable,
    #[error("unknown dialect \"{0}\" (forgot to register it?)")]
    UnknownDialect(String),
    /// A document or a data source failed validation.
    #[error("{0}")]
    Invalid(String),
}

impl JdbError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Coarse classification of a backend failure.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    Data,
    Integrity,
    Transaction,
    Authorization,
    Busy,
    Permission,
    Connection,
    #[default]
    Unknown,
}

/// Failure reported by an executor, as the backend described it.
///
/// `code` is the native error code rendered as text: the numeric result code for sqlite, the
/// SQLSTATE for postgres, the error number for mysql.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct BackendError {
    pub code: String,
    pub message: String,
}

impl BackendError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A [`BackendError`] after the dialect classified it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub struct DatabaseError {
    pub error_type: ErrorType,
    #[source]
    pub source: BackendError,
}

impl DatabaseError {
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} error: {}", self.error_type, self.source)
    }
}
