/// Query Construction Module
///
/// This module turns table names, records and condition maps into SQL text
/// with positional `?` placeholders and the matching parameter list. Every
/// value travels as a bound parameter; only validated identifiers are
/// interpolated.
use crate::core::db::schema::validate_identifier;
use crate::core::db::value::{Record, Row, Value};
use crate::core::{HandleError, Result};

/// Represents different SQL statement types a handle issues
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementType {
    /// SELECT statement
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// CREATE statement
    Create,
    /// ALTER statement
    Alter,
    /// DROP statement
    Drop,
    /// Other statement types
    Other,
}

impl StatementType {
    /// Determines the statement type from a SQL string
    pub fn from_sql(sql: &str) -> Self {
        let sql_upper = sql.trim_start().to_uppercase();

        if sql_upper.starts_with("SELECT") {
            StatementType::Select
        } else if sql_upper.starts_with("INSERT") {
            StatementType::Insert
        } else if sql_upper.starts_with("UPDATE") {
            StatementType::Update
        } else if sql_upper.starts_with("DELETE") {
            StatementType::Delete
        } else if sql_upper.starts_with("CREATE") {
            StatementType::Create
        } else if sql_upper.starts_with("ALTER") {
            StatementType::Alter
        } else if sql_upper.starts_with("DROP") {
            StatementType::Drop
        } else {
            StatementType::Other
        }
    }

    /// Notice emitted after a successful statement of this type
    pub fn success_notice(self) -> &'static str {
        match self {
            StatementType::Select => "Rows read successfully",
            StatementType::Insert => "Data inserted successfully",
            StatementType::Update => "Data updated successfully",
            StatementType::Delete => "Data deleted successfully",
            StatementType::Create => "Table created successfully",
            StatementType::Alter => "Column added successfully",
            StatementType::Drop => "Table dropped successfully",
            StatementType::Other => "Statement executed successfully",
        }
    }

    /// Notice prefix used when a failure of this type is swallowed
    pub fn failure_notice(self) -> &'static str {
        match self {
            StatementType::Select => "Error reading table",
            StatementType::Insert => "Error inserting data",
            StatementType::Update => "Error updating data",
            StatementType::Delete => "Error deleting data",
            StatementType::Create => "Error creating table",
            StatementType::Alter => "Error adding column",
            StatementType::Drop => "Error dropping table",
            StatementType::Other => "Error executing statement",
        }
    }
}

/// SQL text plus the positional parameters it expects.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BoundStatement {
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        BoundStatement { sql, params }
    }

    /// A statement with no parameters (DDL, `SELECT *`)
    pub fn bare(sql: String) -> Self {
        BoundStatement::new(sql, Vec::new())
    }

    pub fn statement_type(&self) -> StatementType {
        StatementType::from_sql(&self.sql)
    }
}

/// Builds `col1 = ?<sep>col2 = ?...` and the values in iteration order.
fn equality_terms(
    entries: &Record,
    separator: &str,
    operation: &'static str,
    clause: &'static str,
) -> Result<(String, Vec<Value>)> {
    if entries.is_empty() {
        return Err(HandleError::EmptyClause { operation, clause });
    }

    let mut terms = Vec::with_capacity(entries.len());
    let mut values = Vec::with_capacity(entries.len());
    for (column, value) in entries {
        validate_identifier(column)?;
        terms.push(format!("{} = ?", column));
        values.push(value.clone());
    }

    Ok((terms.join(separator), values))
}

/// `SELECT * FROM <table>`
pub fn select_all(table: &str) -> Result<BoundStatement> {
    validate_identifier(table)?;
    Ok(BoundStatement::bare(format!("SELECT * FROM {}", table)))
}

/// `SELECT * FROM <table> WHERE c1 = ? AND c2 = ?...`
pub fn select_where(table: &str, condition: &Record) -> Result<BoundStatement> {
    validate_identifier(table)?;
    let (predicate, params) = equality_terms(condition, " AND ", "read", "condition")?;
    Ok(BoundStatement::new(
        format!("SELECT * FROM {} WHERE {}", table, predicate),
        params,
    ))
}

/// `INSERT INTO <table> (c1, c2...) VALUES (?, ?...)`
pub fn insert(table: &str, record: &Record) -> Result<BoundStatement> {
    validate_identifier(table)?;
    if record.is_empty() {
        return Err(HandleError::EmptyClause {
            operation: "insert",
            clause: "record",
        });
    }
    for column in record.keys() {
        validate_identifier(column)?;
    }

    let column_list = record.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
    let placeholders = vec!["?"; record.len()].join(", ");
    Ok(BoundStatement::new(
        format!("INSERT INTO {} ({}) VALUES ({})", table, column_list, placeholders),
        record.values().cloned().collect(),
    ))
}

/// `UPDATE <table> SET c1 = ?... WHERE k1 = ? AND...`
///
/// Parameters are the new values followed by the condition values.
pub fn update(table: &str, values: &Record, condition: &Record) -> Result<BoundStatement> {
    validate_identifier(table)?;
    let (assignments, mut params) = equality_terms(values, ", ", "update", "set of new values")?;
    let (predicate, condition_params) = equality_terms(condition, " AND ", "update", "condition")?;
    params.extend(condition_params);

    Ok(BoundStatement::new(
        format!("UPDATE {} SET {} WHERE {}", table, assignments, predicate),
        params,
    ))
}

/// `DELETE FROM <table> WHERE f1 = ? AND f2 = ?...`
pub fn delete(table: &str, condition: &Record) -> Result<BoundStatement> {
    validate_identifier(table)?;
    let (predicate, params) = equality_terms(condition, " AND ", "delete", "condition")?;
    Ok(BoundStatement::new(
        format!("DELETE FROM {} WHERE {}", table, predicate),
        params,
    ))
}

/// Result of a read that keeps "no rows" and "failed" apart.
#[derive(Debug)]
pub enum ReadOutcome {
    /// The query succeeded and matched at least one row
    Rows(Vec<Row>),
    /// The query succeeded and matched nothing
    Empty,
    /// The query could not be run
    Failed(HandleError),
}

impl ReadOutcome {
    pub fn from_result(result: Result<Vec<Row>>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => ReadOutcome::Empty,
            Ok(rows) => ReadOutcome::Rows(rows),
            Err(e) => ReadOutcome::Failed(e),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ReadOutcome::Failed(_))
    }

    /// Collapses the outcome into the row list, treating failure as no rows.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            ReadOutcome::Rows(rows) => rows,
            ReadOutcome::Empty | ReadOutcome::Failed(_) => Vec::new(),
        }
    }

    /// Converts back into a `Result`, with `Empty` becoming an empty list.
    pub fn into_result(self) -> Result<Vec<Row>> {
        match self {
            ReadOutcome::Rows(rows) => Ok(rows),
            ReadOutcome::Empty => Ok(Vec::new()),
            ReadOutcome::Failed(e) => Err(e),
        }
    }
}
