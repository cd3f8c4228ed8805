/// Schema Module
///
/// This module builds the DDL statements a handle issues (create table,
/// add column, drop table) and introspects existing tables through
/// `PRAGMA table_info`.
///
/// Identifiers cannot be bound as parameters, so every table and column name
/// is checked against a plain-identifier pattern before it is interpolated
/// into statement text. Names should still come from trusted code, never
/// from end-user input.
use crate::core::{HandleError, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, Row};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"));

static COLUMN_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_ (),]*$").expect("column type pattern"));

/// Ordered column name to declared type mapping used by `create_table`.
pub type ColumnSpec = IndexMap<String, String>;

/// Builds a `ColumnSpec` from `(name, declared type)` pairs, keeping their order.
pub fn columns<K, V, I>(pairs: I) -> ColumnSpec
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Checks that `name` is a plain SQL identifier.
///
/// # Errors
///
/// Returns `HandleError::InvalidIdentifier` for anything else, including
/// empty names, quoted names and names containing whitespace.
pub fn validate_identifier(name: &str) -> Result<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(HandleError::InvalidIdentifier(name.to_string()))
    }
}

/// Checks that a column type descriptor such as `INTEGER PRIMARY KEY` or
/// `VARCHAR(20)` contains no quotes, semicolons or comment markers.
pub fn validate_column_type(column_type: &str) -> Result<()> {
    if COLUMN_TYPE.is_match(column_type.trim()) {
        Ok(())
    } else {
        Err(HandleError::InvalidColumnType(column_type.to_string()))
    }
}

/// Generates the permissive legacy CHECK clause for a column.
///
/// The clause depends only on the first word of the declared type:
/// - `INTEGER` / `NUMERIC`: value must be digits only, or NULL
/// - `REAL`: textual form must contain at least one digit. This is an
///   approximation and does not validate the numeric format.
///
/// Any other first word yields `None`.
pub fn check_constraint(column: &str, column_type: &str) -> Option<String> {
    let first_word = column_type.split_whitespace().next()?.to_uppercase();
    match first_word.as_str() {
        "INTEGER" | "NUMERIC" => Some(format!(
            "CHECK ({column} IS NULL OR ({column} <> '' AND {column} NOT GLOB '*[^0-9]*'))"
        )),
        "REAL" => Some(format!("CHECK ({column} IS NULL OR {column} GLOB '*[0-9]*')")),
        _ => None,
    }
}

/// Builds one column definition: `"<name> <type>"`, plus the legacy CHECK
/// clause when `apply_constraints` is set.
pub fn column_definition(name: &str, column_type: &str, apply_constraints: bool) -> Result<String> {
    validate_identifier(name)?;
    validate_column_type(column_type)?;

    let column_type = column_type.trim();
    let constraint = if apply_constraints {
        check_constraint(name, column_type)
    } else {
        None
    };

    Ok(match constraint {
        Some(check) => format!("{name} {column_type} {check}"),
        None => format!("{name} {column_type}"),
    })
}

/// Builds `CREATE TABLE <table> (<defs>)`.
///
/// # Errors
///
/// Returns `HandleError::EmptyClause` when `columns` is empty, or an
/// identifier/type error for any invalid entry.
pub fn create_table_sql(table: &str, columns: &ColumnSpec, apply_constraints: bool) -> Result<String> {
    validate_identifier(table)?;
    if columns.is_empty() {
        return Err(HandleError::EmptyClause {
            operation: "create table",
            clause: "column list",
        });
    }

    let definitions = columns
        .iter()
        .map(|(name, column_type)| column_definition(name, column_type, apply_constraints))
        .collect::<Result<Vec<_>>>()?;

    Ok(format!("CREATE TABLE {} ({})", table, definitions.join(", ")))
}

/// Builds `ALTER TABLE <table> ADD COLUMN <name> <type>`.
pub fn add_column_sql(table: &str, column: &str, column_type: &str) -> Result<String> {
    validate_identifier(table)?;
    let definition = column_definition(column, column_type, false)?;
    Ok(format!("ALTER TABLE {table} ADD COLUMN {definition}"))
}

/// Builds `DROP TABLE IF EXISTS <table>`.
pub fn drop_table_sql(table: &str) -> Result<String> {
    validate_identifier(table)?;
    Ok(format!("DROP TABLE IF EXISTS {table}"))
}

/// Represents a database column with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type as written in the table definition
    pub type_name: String,
    /// Whether the column is declared NOT NULL
    pub notnull: bool,
    /// Whether this column is part of the primary key
    pub pk: bool,
    /// Default value expression (if any)
    pub dflt_value: Option<String>,
}

impl Column {
    /// Creates a Column from a PRAGMA table_info result row
    fn from_pragma_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Column {
            name: row.get(1)?,
            type_name: row.get(2)?,
            notnull: row.get(3)?,
            pk: row.get::<_, i64>(5)? > 0,
            dflt_value: row.get(4)?,
        })
    }
}

/// Lists user-defined tables, sorted by name.
pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type='table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(names)
}

/// Retrieves column information for a table in declaration order.
///
/// An unknown table yields an empty list, matching `PRAGMA table_info`.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<Column>> {
    validate_identifier(table)?;

    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let columns = stmt
        .query_map([], |row| Column::from_pragma_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(columns)
}
