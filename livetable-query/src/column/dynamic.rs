use std::sync::Arc;

use super::Column;
use crate::error::ColumnError;
use crate::ColumnType;

/// A family of columns parameterized by a query-time argument string.
///
/// Rather than materializing every variant up front, the table keeps the
/// factory and builds the concrete column once a query names it, e.g.
/// `file:crash.info`. The produced column is an ordinary [Column] so the
/// query side never needs to know it came from a dynamic declaration.
pub trait DynamicColumn<T>: Send + Sync {
    /// The declared (unprefixed) name of the column family.
    fn name(&self) -> &str;

    /// A human readable description of the column family.
    fn description(&self) -> &str;

    /// The type of values the produced columns return.
    fn kind(&self) -> ColumnType;

    /// Builds the column for the given arguments.
    ///
    /// Returns an error if the arguments are rejected by the family.
    fn make_column(&self, arguments: &str) -> Result<Box<dyn Column<T> + '_>, ColumnError>;
}

impl<T, D> DynamicColumn<T> for Arc<D>
where
    D: DynamicColumn<T> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn kind(&self) -> ColumnType {
        (**self).kind()
    }

    fn make_column(&self, arguments: &str) -> Result<Box<dyn Column<T> + '_>, ColumnError> {
        (**self).make_column(arguments)
    }
}
