/// Database Module
///
/// ## Architecture
///
/// The database layer is split into four concerns:
/// - **Values** (`value.rs`): Scalars, ordered records and result rows
/// - **Query Construction** (`query.rs`): Parameterized CRUD statements and read outcomes
/// - **Schema** (`schema.rs`): Identifier checks, DDL text and table introspection
/// - **Connection Management** (`connection.rs`): The handle, its lifecycle and error policy
///
/// ## Error Handling
///
/// All database operations use the standardized `HandleError` type for consistent error propagation.
pub mod connection;
pub mod query;
pub mod schema;
pub mod value;

pub use connection::*;
pub use query::{BoundStatement, ReadOutcome, StatementType};
pub use schema::{columns, Column, ColumnSpec};
pub use value::{record, Record, Row, Value};
