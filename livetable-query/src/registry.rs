use std::fmt::{Debug, Formatter};

use crate::column::validate_name;
use crate::{Column, ColumnError, ColumnInfo, DynamicColumn};

#[derive(Debug, Copy, Clone)]
enum Slot {
    Static(usize),
    Dynamic(usize),
}

/// The static and dynamic columns of a table over rows of type `T`.
///
/// A registry is assembled once with a [ColumnRegistryBuilder] when the
/// table is constructed and is immutable afterwards, columns can never be
/// removed or redefined. Since nothing mutates it after construction it can
/// be read from any number of concurrent queries without locking.
pub struct ColumnRegistry<T> {
    columns: Vec<Box<dyn Column<T>>>,
    dynamic_columns: Vec<Box<dyn DynamicColumn<T>>>,
    index: ahash::HashMap<String, Slot>,
}

impl<T> ColumnRegistry<T> {
    /// Creates a new [ColumnRegistryBuilder].
    pub fn builder() -> ColumnRegistryBuilder<T> {
        ColumnRegistryBuilder {
            registry: ColumnRegistry {
                columns: Vec::new(),
                dynamic_columns: Vec::new(),
                index: ahash::HashMap::default(),
            },
        }
    }

    /// Returns the static columns in the order they were registered.
    pub fn columns(&self) -> impl Iterator<Item = &dyn Column<T>> {
        self.columns.iter().map(|c| c.as_ref())
    }

    /// Returns the dynamic columns in the order they were registered.
    pub fn dynamic_columns(&self) -> impl Iterator<Item = &dyn DynamicColumn<T>> {
        self.dynamic_columns.iter().map(|c| c.as_ref())
    }

    /// Looks up a static column by its declared name.
    pub fn column(&self, name: &str) -> Option<&dyn Column<T>> {
        match self.index.get(name)? {
            Slot::Static(idx) => Some(self.columns[*idx].as_ref()),
            Slot::Dynamic(_) => None,
        }
    }

    /// Looks up a dynamic column by its declared name.
    pub fn dynamic_column(&self, name: &str) -> Option<&dyn DynamicColumn<T>> {
        match self.index.get(name)? {
            Slot::Dynamic(idx) => Some(self.dynamic_columns[*idx].as_ref()),
            Slot::Static(_) => None,
        }
    }

    /// Returns the metadata of every column, static columns first.
    ///
    /// This never extracts any values.
    pub fn describe(&self, prefix: &str) -> Vec<ColumnInfo> {
        let static_columns = self.columns().map(|c| ColumnInfo {
            name: format!("{prefix}{}", c.name()),
            description: c.description().to_string(),
            kind: c.kind(),
            dynamic: false,
        });
        let dynamic_columns = self.dynamic_columns().map(|c| ColumnInfo {
            name: format!("{prefix}{}", c.name()),
            description: c.description().to_string(),
            kind: c.kind(),
            dynamic: true,
        });

        let mut infos = Vec::with_capacity(self.len());
        infos.extend(static_columns.chain(dynamic_columns));
        infos
    }

    /// The total number of static and dynamic columns.
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }
}

impl<T> Debug for ColumnRegistry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnRegistry")
            .field("columns", &self.columns().map(|c| c.name()).collect::<Vec<_>>())
            .field(
                "dynamic_columns",
                &self.dynamic_columns().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Assembles a [ColumnRegistry], rejecting invalid or duplicate names
/// as soon as they are registered.
pub struct ColumnRegistryBuilder<T> {
    registry: ColumnRegistry<T>,
}

impl<T> ColumnRegistryBuilder<T> {
    /// Registers a static column.
    pub fn add_column<C>(&mut self, column: C) -> Result<&mut Self, ColumnError>
    where
        C: Column<T> + 'static,
    {
        let slot = Slot::Static(self.registry.columns.len());
        self.reserve(column.name(), slot)?;
        self.registry.columns.push(Box::new(column));
        Ok(self)
    }

    /// Registers a dynamic column.
    pub fn add_dynamic_column<C>(&mut self, column: C) -> Result<&mut Self, ColumnError>
    where
        C: DynamicColumn<T> + 'static,
    {
        let slot = Slot::Dynamic(self.registry.dynamic_columns.len());
        self.reserve(column.name(), slot)?;
        self.registry.dynamic_columns.push(Box::new(column));
        Ok(self)
    }

    /// Finishes the registry.
    pub fn build(self) -> ColumnRegistry<T> {
        self.registry
    }

    fn reserve(&mut self, name: &str, slot: Slot) -> Result<(), ColumnError> {
        validate_name(name)?;

        if self.registry.index.contains_key(name) {
            return Err(ColumnError::DuplicateColumn(name.to_string()));
        }

        self.registry.index.insert(name.to_string(), slot);
        Ok(())
    }
}
