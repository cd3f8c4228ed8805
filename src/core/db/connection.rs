/// Connection Management Module
///
/// This module provides `DatabaseHandle`, which owns a lazily opened
/// connection to a single-file store and runs CRUD and DDL statements
/// against it, one auto-committed statement at a time.
///
/// ## Lifecycle
///
/// `Closed --open()--> Open --close()--> Closed`. Calling `open()` on an open
/// handle keeps the existing connection. Every statement requires `Open`;
/// on a closed handle it fails with `HandleError::NotConnected`.
///
/// ## Error policy
///
/// Each handle carries an `ErrorPolicy`. Under `Swallow` (the default) a
/// failed operation logs a warning and returns a benign value: `false` for
/// writes and DDL, an empty list for reads. Under `Propagate` the typed error
/// is returned to the caller. Use `fetch_all`/`fetch_where` to tell "no rows"
/// from "failed" regardless of policy.
///
/// A handle is `Send` but not `Sync`; share it across threads only behind
/// a lock.
use crate::config::HandleConfig;
use crate::core::db::query::{self, BoundStatement, ReadOutcome, StatementType};
use crate::core::db::schema::{self, Column, ColumnSpec};
use crate::core::db::value::{Record, Row, Value};
use crate::core::{HandleError, Result};
use rusqlite::{params_from_iter, Connection};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, warn};

/// How an operation reports failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the failure and return `false` / an empty list
    #[default]
    Swallow,
    /// Return the typed error to the caller
    Propagate,
}

/// Represents the connection state of a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection (initial state, or after `close()`)
    #[default]
    Closed,
    /// Connection established and probed
    Open,
}

/// Connection handle with CRUD and schema helpers.
///
/// # Examples
///
/// ```
/// use sqlite_connect::{columns, record, DatabaseHandle, ErrorPolicy, Value};
///
/// let mut db = DatabaseHandle::with_policy(":memory:", ErrorPolicy::Propagate);
/// assert!(db.open()?);
///
/// db.create_table("parts", &columns([("id", "INTEGER"), ("name", "TEXT")]), false)?;
/// db.insert("parts", &record([("id", Value::from(1)), ("name", Value::from("gear"))]))?;
///
/// let rows = db.read_where("parts", &record([("id", 1)]))?;
/// assert_eq!(rows, vec![vec![Value::Integer(1), Value::from("gear")]]);
///
/// db.close();
/// # Ok::<(), sqlite_connect::HandleError>(())
/// ```
#[derive(Debug)]
pub struct DatabaseHandle {
    location: String,
    error_policy: ErrorPolicy,
    apply_constraints: bool,
    connection: Option<Connection>,
}

impl DatabaseHandle {
    /// Creates a closed handle with the `Swallow` policy. Performs no I/O.
    pub fn new(location: impl Into<String>) -> Self {
        DatabaseHandle::with_policy(location, ErrorPolicy::default())
    }

    /// Creates a closed handle with an explicit error policy. Performs no I/O.
    pub fn with_policy(location: impl Into<String>, error_policy: ErrorPolicy) -> Self {
        DatabaseHandle {
            location: location.into(),
            error_policy,
            apply_constraints: false,
            connection: None,
        }
    }

    /// Creates a closed handle from a loaded configuration.
    pub fn from_config(config: &HandleConfig) -> Self {
        DatabaseHandle {
            location: config.location.clone(),
            error_policy: config.error_policy,
            apply_constraints: config.apply_constraints,
            connection: None,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    pub fn connection_state(&self) -> ConnectionState {
        if self.connection.is_some() {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    /// Returns `true` while the handle holds an open connection
    pub fn is_open(&self) -> bool {
        self.connection_state() == ConnectionState::Open
    }

    /// Human-readable location and connection state
    pub fn describe(&self) -> String {
        let status = match self.connection_state() {
            ConnectionState::Open => "Connected",
            ConnectionState::Closed => "Not connected",
        };
        format!("Database: {}\nStatus: {}", self.location, status)
    }

    /// Opens the store at `location`.
    ///
    /// The connection is probed with a schema read so that an unreadable or
    /// non-database file fails here rather than on the first statement. If the
    /// handle is already open this is a no-op that returns `true`.
    ///
    /// # Errors
    ///
    /// With `ErrorPolicy::Propagate`, returns `HandleError::Connection`.
    /// With `ErrorPolicy::Swallow`, logs the failure and returns `Ok(false)`.
    pub fn open(&mut self) -> Result<bool> {
        if self.is_open() {
            debug!(location = %self.location, "Connection already open, keeping it");
            return Ok(true);
        }

        match self.establish() {
            Ok(conn) => {
                self.connection = Some(conn);
                info!(location = %self.location, "Connection established");
                Ok(true)
            }
            Err(e) => self.settle(Err(e), "Error connecting", || false),
        }
    }

    fn establish(&self) -> Result<Connection> {
        let to_connection_error = |source| HandleError::Connection {
            location: self.location.clone(),
            source,
        };

        let conn = Connection::open(&self.location).map_err(to_connection_error)?;
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(to_connection_error)?;
        Ok(conn)
    }

    /// Releases the connection if there is one. Safe to call repeatedly and
    /// on a handle that was never opened.
    pub fn close(&mut self) {
        if let Some(conn) = self.connection.take() {
            match conn.close() {
                Ok(()) => info!(location = %self.location, "Connection closed"),
                Err((_conn, e)) => {
                    warn!(location = %self.location, error = %e, "Error closing connection")
                }
            }
        }
    }

    /// Reads every row of `table`. An empty table yields an empty list.
    pub fn read_all(&self, table: &str) -> Result<Vec<Row>> {
        let result = query::select_all(table).and_then(|stmt| self.run_query(&stmt));
        self.settle(result, StatementType::Select.failure_notice(), Vec::new)
    }

    /// Reads the rows of `table` whose columns equal every value in `condition`.
    pub fn read_where(&self, table: &str, condition: &Record) -> Result<Vec<Row>> {
        let result = query::select_where(table, condition).and_then(|stmt| self.run_query(&stmt));
        self.settle(result, StatementType::Select.failure_notice(), Vec::new)
    }

    /// Like `read_all`, but reports failure separately from an empty result
    /// and ignores the error policy.
    pub fn fetch_all(&self, table: &str) -> ReadOutcome {
        ReadOutcome::from_result(query::select_all(table).and_then(|stmt| self.run_query(&stmt)))
    }

    /// Like `read_where`, but reports failure separately from an empty result
    /// and ignores the error policy.
    pub fn fetch_where(&self, table: &str, condition: &Record) -> ReadOutcome {
        ReadOutcome::from_result(
            query::select_where(table, condition).and_then(|stmt| self.run_query(&stmt)),
        )
    }

    /// Inserts one record, binding its values in iteration order.
    pub fn insert(&self, table: &str, record: &Record) -> Result<bool> {
        self.write(query::insert(table, record), StatementType::Insert)
    }

    /// Sets `values` on every row matching `condition`. Matching zero rows
    /// is not an error.
    pub fn update(&self, table: &str, values: &Record, condition: &Record) -> Result<bool> {
        self.write(query::update(table, values, condition), StatementType::Update)
    }

    /// Deletes every row matching `condition`. Values are bound as
    /// parameters, never spliced into the statement text.
    pub fn delete(&self, table: &str, condition: &Record) -> Result<bool> {
        self.write(query::delete(table, condition), StatementType::Delete)
    }

    /// Creates `table` with the given columns. With `apply_constraints`,
    /// INTEGER/NUMERIC and REAL columns also get the permissive legacy CHECK
    /// clauses from `schema::check_constraint`.
    pub fn create_table(&self, table: &str, columns: &ColumnSpec, apply_constraints: bool) -> Result<bool> {
        let stmt = schema::create_table_sql(table, columns, apply_constraints).map(BoundStatement::bare);
        self.write(stmt, StatementType::Create)
    }

    /// `create_table` using the handle's configured constraint default.
    pub fn create_table_with_defaults(&self, table: &str, columns: &ColumnSpec) -> Result<bool> {
        self.create_table(table, columns, self.apply_constraints)
    }

    pub fn add_column(&self, table: &str, column: &str, column_type: &str) -> Result<bool> {
        let stmt = schema::add_column_sql(table, column, column_type).map(BoundStatement::bare);
        self.write(stmt, StatementType::Alter)
    }

    /// Drops `table`. A table that does not exist is not an error.
    pub fn drop_table(&self, table: &str) -> Result<bool> {
        let stmt = schema::drop_table_sql(table).map(BoundStatement::bare);
        self.write(stmt, StatementType::Drop)
    }

    /// Lists the user tables in the store, sorted by name.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let result = self.connection().and_then(schema::table_names);
        self.settle(result, "Error listing tables", Vec::new)
    }

    /// Lists the columns of `table` in declaration order.
    pub fn table_columns(&self, table: &str) -> Result<Vec<Column>> {
        let result = self
            .connection()
            .and_then(|conn| schema::table_columns(conn, table));
        self.settle(result, "Error reading table columns", Vec::new)
    }

    fn connection(&self) -> Result<&Connection> {
        self.connection.as_ref().ok_or_else(|| HandleError::NotConnected {
            location: self.location.clone(),
        })
    }

    fn run_query(&self, stmt: &BoundStatement) -> Result<Vec<Row>> {
        let conn = self.connection()?;
        debug!(sql = %stmt.sql, params = stmt.params.len(), "Executing query");

        let mut prepared = conn.prepare(&stmt.sql)?;
        let column_count = prepared.column_count();
        let rows = prepared
            .query_map(params_from_iter(stmt.params.iter()), |row| {
                (0..column_count)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Row>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(rows = rows.len(), "{}", StatementType::Select.success_notice());
        Ok(rows)
    }

    fn run_statement(&self, stmt: &BoundStatement) -> Result<usize> {
        let conn = self.connection()?;
        debug!(sql = %stmt.sql, params = stmt.params.len(), "Executing statement");

        // The connection stays in autocommit mode, so the statement is
        // committed as soon as it completes.
        let affected = conn.execute(&stmt.sql, params_from_iter(stmt.params.iter()))?;
        Ok(affected)
    }

    fn write(&self, stmt: Result<BoundStatement>, kind: StatementType) -> Result<bool> {
        let result = stmt.and_then(|stmt| self.run_statement(&stmt)).map(|affected| {
            info!(location = %self.location, affected, "{}", kind.success_notice());
            true
        });
        self.settle(result, kind.failure_notice(), || false)
    }

    /// Applies the error policy at the operation boundary.
    fn settle<T>(&self, result: Result<T>, failure: &str, fallback: impl FnOnce() -> T) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => match self.error_policy {
                ErrorPolicy::Propagate => Err(e),
                ErrorPolicy::Swallow => {
                    warn!(location = %self.location, error = %e, "{}", failure);
                    Ok(fallback())
                }
            },
        }
    }
}

impl fmt::Display for DatabaseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
