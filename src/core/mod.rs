/// Core Module
///
/// This module contains the database handle and its supporting pieces:
/// value types, statement construction, schema helpers and the shared
/// error type.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, HandleError, Result};
