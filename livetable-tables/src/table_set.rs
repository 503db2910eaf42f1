use std::sync::Arc;

use livetable_fs::HostConfig;
use livetable_query::{AnyTable, ColumnError};
use tracing::info;

use crate::TableCrashReports;

#[derive(Debug, thiserror::Error)]
/// An error that can occur while assembling the [TableSet].
pub enum TableSetError {
    #[error("Duplicate table: {0:?}")]
    /// A table with the same name is already registered.
    DuplicateTable(String),
    #[error("Column Error: {0}")]
    /// A table could not declare its columns.
    Column(#[from] ColumnError),
}

/// The tables of the process, addressed by name.
///
/// The set is assembled once on startup and lives as long as the process.
#[derive(Default)]
pub struct TableSet {
    tables: Vec<Box<dyn AnyTable>>,
    index: ahash::HashMap<String, usize>,
}

impl TableSet {
    /// Creates the set of all tables livetable serves.
    pub fn new(config: Arc<HostConfig>) -> Result<Self, TableSetError> {
        let mut tables = Self::default();
        tables.add(TableCrashReports::new(config)?)?;
        Ok(tables)
    }

    /// Registers a table.
    pub fn add<T>(&mut self, table: T) -> Result<&mut Self, TableSetError>
    where
        T: AnyTable + 'static,
    {
        let name = table.table_name().to_string();
        if self.index.contains_key(&name) {
            return Err(TableSetError::DuplicateTable(name));
        }

        info!(table = %name, num_columns = table.schema().len(), "Registered table");
        self.index.insert(name, self.tables.len());
        self.tables.push(Box::new(table));
        Ok(self)
    }

    /// Looks up a table by name.
    pub fn get(&self, name: &str) -> Option<&dyn AnyTable> {
        let idx = self.index.get(name)?;
        Some(self.tables[*idx].as_ref())
    }

    /// Returns all tables in the order they were registered.
    pub fn tables(&self) -> impl Iterator<Item = &dyn AnyTable> {
        self.tables.iter().map(|t| t.as_ref())
    }
}
