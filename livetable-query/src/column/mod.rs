mod dynamic;
mod file;
mod lambda;

use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

pub use self::dynamic::DynamicColumn;
pub use self::file::{ArgumentPolicy, DynamicFileColumn, FileColumn, FileResolver};
pub use self::lambda::LambdaColumn;
use crate::error::ColumnError;
use crate::{ColumnType, Row, Value};

/// Supplies the root directory dynamic file columns resolve against.
///
/// The supplier is called on every resolution so changes to the host
/// configuration are picked up without rebuilding the table.
pub type BasePath = Arc<dyn Fn() -> PathBuf + Send + Sync>;

/// Accessor methods for a column over rows of type `T`.
///
/// Each implementation is bound to its domain type when it is registered,
/// the registry then stores all columns of a table uniformly as
/// `Box<dyn Column<T>>`.
pub trait Column<T>: Send + Sync {
    /// The declared (unprefixed) name of the column.
    fn name(&self) -> &str;

    /// A human readable description of the column.
    fn description(&self) -> &str;

    /// The type of values this column produces.
    fn kind(&self) -> ColumnType;

    /// Extracts the value of this column for the given row.
    ///
    /// This never fails, a logically absent field produces the neutral value
    /// of the column's type. Calling this repeatedly for the same row yields
    /// identical values.
    fn value(&self, row: Row<'_, T>) -> Value;
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
/// Column metadata exposed for schema introspection.
pub struct ColumnInfo {
    /// The fully qualified name of the column (`prefix + name`).
    pub name: String,
    /// The human readable description.
    pub description: String,
    /// The type of values the column produces.
    #[serde(rename = "type")]
    pub kind: ColumnType,
    /// If the column is a dynamic column family requiring arguments.
    pub dynamic: bool,
}

/// Locates the domain object a column reads within the table's row type.
///
/// Tables whose rows embed several domain types register columns over
/// each of them, the offsets project the row onto the part the column
/// understands. Every column of a table starts from the same row type `T`
/// so the offsets of a table are always consistent.
pub struct Offsets<T, U = T> {
    project: fn(&T) -> Option<&U>,
}

impl<T> Offsets<T, T> {
    /// Offsets for columns reading the row type directly.
    pub fn identity() -> Self {
        Self { project: |row| Some(row) }
    }
}

impl<T, U> Offsets<T, U> {
    /// Offsets following the given projection from the row type to
    /// the column's domain type.
    ///
    /// A projection returning `None` makes the column produce its neutral value.
    pub fn new(project: fn(&T) -> Option<&U>) -> Self {
        Self { project }
    }

    #[inline]
    pub(crate) fn project<'a>(&self, row: &'a T) -> Option<&'a U> {
        (self.project)(row)
    }
}

impl<T, U> Clone for Offsets<T, U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, U> Copy for Offsets<T, U> {}

impl<T, U> Debug for Offsets<T, U> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Offsets").finish_non_exhaustive()
    }
}

/// Checks a declared column name can be addressed by queries.
pub(crate) fn validate_name(name: &str) -> Result<(), ColumnError> {
    if name.is_empty() {
        return Err(ColumnError::InvalidName {
            name: name.to_string(),
            reason: "name must not be empty",
        });
    }

    if name.contains(':') {
        return Err(ColumnError::InvalidName {
            name: name.to_string(),
            reason: "':' is reserved for dynamic column arguments",
        });
    }

    if name.chars().any(char::is_whitespace) {
        return Err(ColumnError::InvalidName {
            name: name.to_string(),
            reason: "name must not contain whitespace",
        });
    }

    Ok(())
}
