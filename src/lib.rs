//! A connection handle over a single-file SQLite store with CRUD helpers
//! and simple schema operations.
//!
//! Every value is bound as a statement parameter. Table and column names
//! are interpolated into statement text after an identifier check, so they
//! must come from trusted code rather than end-user input.

// Core infrastructure modules
pub mod core;

pub mod config;

pub use crate::config::{load_config, HandleConfig};
pub use crate::core::db::{
    columns, record, BoundStatement, Column, ColumnSpec, ConnectionState, DatabaseHandle,
    ErrorPolicy, ReadOutcome, Record, Row, StatementType, Value,
};
pub use crate::core::{ErrorKind, HandleError, Result};
