//! Live state tables.
//!
//! A table exposes transient domain objects, for example the crash reports
//! recorded by a monitoring agent, as rows of typed columns. Objects are
//! enumerated from an external [Enumerator] for the duration of one query
//! and never copied: every value is re-derived from the object through a
//! [Column] when the [QuerySink] asks for it.

mod column;
mod error;
mod projection;
mod registry;
mod row;
mod source;
mod table;
mod value;

pub use self::column::{
    ArgumentPolicy, BasePath, Column, ColumnInfo, DynamicColumn, DynamicFileColumn, FileColumn,
    FileResolver, LambdaColumn, Offsets,
};
pub use self::error::{ColumnError, QueryError};
pub use self::projection::{ColumnSpec, Projection};
pub use self::registry::{ColumnRegistry, ColumnRegistryBuilder};
pub use self::row::Row;
pub use self::source::{EnumerateError, Enumerator};
pub use self::table::{AnyTable, QuerySink, Table};
pub use self::value::{ColumnType, ColumnValue, Value};
