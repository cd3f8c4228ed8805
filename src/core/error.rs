/// Error Module
///
/// This module defines the error taxonomy for database handles. Every
/// failure an operation can produce is a `HandleError`; callers that only
/// care about the broad category can match on `HandleError::kind()`.
use thiserror::Error;

/// Broad failure categories a handle can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The store could not be opened or probed
    Connection,
    /// A CRUD/DDL statement could not be built or executed
    Statement,
    /// An operation was invoked while the handle was closed
    NotConnected,
    /// Configuration could not be loaded
    Config,
}

/// Errors produced by `DatabaseHandle` operations.
#[derive(Error, Debug)]
pub enum HandleError {
    /// Failure to establish a connection to the store (bad path, permissions, corruption)
    #[error("Connection error for '{location}': {source}")]
    Connection {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Driver failure while preparing or executing a statement
    #[error("Statement error: {0}")]
    Statement(#[from] rusqlite::Error),

    /// An operation was attempted before `open()` succeeded or after `close()`
    #[error("Not connected: '{location}' has no open connection")]
    NotConnected { location: String },

    /// Table or column name that is not a plain SQL identifier
    #[error("Invalid identifier '{0}': expected letters, digits and underscores, not starting with a digit")]
    InvalidIdentifier(String),

    /// Column type descriptor containing characters outside the accepted set
    #[error("Invalid column type '{0}'")]
    InvalidColumnType(String),

    /// A condition map, record or column list that would produce malformed SQL
    #[error("Statement error: {operation} requires a non-empty {clause}")]
    EmptyClause {
        operation: &'static str,
        clause: &'static str,
    },

    /// Configuration parsing and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HandleError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandleError::Connection { .. } => ErrorKind::Connection,
            HandleError::Statement(_)
            | HandleError::InvalidIdentifier(_)
            | HandleError::InvalidColumnType(_)
            | HandleError::EmptyClause { .. } => ErrorKind::Statement,
            HandleError::NotConnected { .. } => ErrorKind::NotConnected,
            HandleError::Config(_) | HandleError::Io(_) => ErrorKind::Config,
        }
    }
}

/// Type alias for Result to use HandleError as the error type.
pub type Result<T> = std::result::Result<T, HandleError>;
