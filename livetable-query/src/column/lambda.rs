//! Columns backed by a plain extraction function.

use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use super::{Column, Offsets};
use crate::{ColumnType, ColumnValue, Row, Value};

/// A column extracting a `V` from the domain type `U` with a closure.
///
/// The closure is monomorphized into the column, so once the column is
/// boxed into a registry reading a value costs a single dynamic call.
pub struct LambdaColumn<T, U, V, F> {
    name: String,
    description: String,
    offsets: Offsets<T, U>,
    extract: F,
    _value: PhantomData<fn() -> V>,
}

impl<T, U, V, F> LambdaColumn<T, U, V, F>
where
    V: ColumnValue,
    F: Fn(&U) -> V,
{
    /// Creates a new column with the given name and description.
    ///
    /// The extraction function must be pure and total: it is called any
    /// number of times for the same row and must always return the same value.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        offsets: Offsets<T, U>,
        extract: F,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            offsets,
            extract,
            _value: PhantomData,
        }
    }
}

impl<T, U, V, F> Column<T> for LambdaColumn<T, U, V, F>
where
    V: ColumnValue,
    F: Fn(&U) -> V + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn kind(&self) -> ColumnType {
        V::KIND
    }

    #[inline]
    fn value(&self, row: Row<'_, T>) -> Value {
        match self.offsets.project(row.get()) {
            Some(entity) => (self.extract)(entity).into_value(),
            None => Value::neutral(V::KIND),
        }
    }
}

impl<T, U, V, F> Debug for LambdaColumn<T, U, V, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LambdaColumn")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
