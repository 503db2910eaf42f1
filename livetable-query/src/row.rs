use std::fmt::{Debug, Formatter};
use std::ops::Deref;

/// A handle to exactly one domain object for the duration of a query pass.
///
/// Rows carry no copy of the object, they borrow it from the enumerator that
/// produced it and can never outlive the sink call that received them.
/// All field access goes back through the table's columns.
pub struct Row<'a, T> {
    entity: &'a T,
}

impl<'a, T> Row<'a, T> {
    #[inline]
    /// Wraps a borrowed domain object as a row.
    pub fn new(entity: &'a T) -> Self {
        Self { entity }
    }

    #[inline]
    /// Returns the domain object this row refers to.
    pub fn get(&self) -> &'a T {
        self.entity
    }
}

impl<T> Clone for Row<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Row<'_, T> {}

impl<T> Deref for Row<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.entity
    }
}

impl<T: Debug> Debug for Row<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Row").field(self.entity).finish()
    }
}
