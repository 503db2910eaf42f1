use crate::EnumerateError;

#[derive(Debug, thiserror::Error)]
/// An error that can occur while declaring the columns of a table.
///
/// These are raised when the table is constructed, no partially built
/// table is ever usable.
pub enum ColumnError {
    #[error("Duplicate column: {0:?}")]
    /// A static or dynamic column with the same name is already registered.
    DuplicateColumn(String),
    #[error("Invalid column name {name:?}: {reason}")]
    /// The column name cannot be addressed by a query.
    InvalidName { name: String, reason: &'static str },
    #[error("Invalid arguments {arguments:?} for column {column:?}: {reason}")]
    /// The arguments given to a dynamic column were rejected.
    InvalidArgument {
        column: String,
        arguments: String,
        reason: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
/// An error that can occur while answering a query.
pub enum QueryError {
    #[error("Unknown column {column:?} in table {table:?}")]
    /// The table has no static or dynamic column with the given name.
    UnknownColumn { table: String, column: String },
    #[error("Column {column:?} in table {table:?} requires arguments")]
    /// A dynamic column was requested without any arguments.
    MissingArguments { table: String, column: String },
    #[error("Column Error: {0}")]
    /// A dynamic column rejected the requested arguments.
    Column(#[from] ColumnError),
    #[error("Failed to enumerate table {table:?}: {source}")]
    /// The backing source of the table could not be enumerated.
    ///
    /// Rows delivered to the sink before the failure remain valid.
    Enumeration {
        table: String,
        #[source]
        source: EnumerateError,
    },
}
