use tracing::{debug, instrument};

use crate::{
    Column, ColumnInfo, ColumnRegistry, ColumnSpec, DynamicColumn, Projection, QueryError, Row,
    Value,
};

/// The consumer of the rows produced by a table.
///
/// This is the boundary to the filter and projection engine, which pulls the
/// fields it needs out of the row through the table's columns.
pub trait QuerySink<T> {
    /// Processes a single row.
    ///
    /// Returns `false` once the sink needs no further rows, after which the
    /// table stops enumerating.
    fn process_dataset(&mut self, row: Row<'_, T>) -> bool;
}

impl<T, F> QuerySink<T> for F
where
    F: FnMut(Row<'_, T>) -> bool,
{
    fn process_dataset(&mut self, row: Row<'_, T>) -> bool {
        (self)(row)
    }
}

/// A table exposing domain objects of type [Table::Entity] as rows.
///
/// Tables are constructed once when the process starts and are read-only
/// afterwards, so they can answer any number of queries concurrently.
pub trait Table: Send + Sync {
    /// The domain object each row refers to.
    type Entity;

    /// The name the table is addressed by.
    fn name(&self) -> &str;

    /// The prefix of the fully qualified names of the table's columns.
    fn name_prefix(&self) -> &str;

    /// The columns of the table.
    fn columns(&self) -> &ColumnRegistry<Self::Entity>;

    /// Enumerates the table's domain objects into the sink.
    ///
    /// Enumeration stops as soon as the sink returns `false`. If the backing
    /// source fails, [QueryError::Enumeration] is returned and any rows
    /// already passed to the sink are left as they are.
    fn answer_query(&self, sink: &mut dyn QuerySink<Self::Entity>) -> Result<(), QueryError>;

    /// Looks up a static column by its declared or fully qualified name.
    fn column(&self, name: &str) -> Option<&dyn Column<Self::Entity>> {
        let columns = self.columns();
        columns.column(name).or_else(|| {
            let declared = name.strip_prefix(self.name_prefix())?;
            columns.column(declared)
        })
    }

    /// Looks up a dynamic column by its declared or fully qualified name.
    fn dynamic_column(&self, name: &str) -> Option<&dyn DynamicColumn<Self::Entity>> {
        let columns = self.columns();
        columns.dynamic_column(name).or_else(|| {
            let declared = name.strip_prefix(self.name_prefix())?;
            columns.dynamic_column(declared)
        })
    }

    /// Returns the metadata of all columns of the table.
    fn describe(&self) -> Vec<ColumnInfo> {
        self.columns().describe(self.name_prefix())
    }
}

/// An object safe view of any [Table], regardless of its row type.
///
/// This allows tables over different domain types to be kept in one set
/// and queried by name.
pub trait AnyTable: Send + Sync {
    /// The name the table is addressed by.
    fn table_name(&self) -> &str;

    /// The prefix of the fully qualified names of the table's columns.
    fn table_prefix(&self) -> &str;

    /// Returns the metadata of all columns of the table.
    fn schema(&self) -> Vec<ColumnInfo>;

    /// Projects the given columns out of every row of the table.
    ///
    /// If no columns are given, all static columns are returned.
    fn fetch(
        &self,
        columns: &[ColumnSpec],
        limit: Option<usize>,
    ) -> Result<Vec<Vec<Value>>, QueryError>;
}

impl<T: Table> AnyTable for T {
    fn table_name(&self) -> &str {
        self.name()
    }

    fn table_prefix(&self) -> &str {
        self.name_prefix()
    }

    fn schema(&self) -> Vec<ColumnInfo> {
        self.describe()
    }

    #[instrument(skip(self), fields(table = self.name()))]
    fn fetch(
        &self,
        columns: &[ColumnSpec],
        limit: Option<usize>,
    ) -> Result<Vec<Vec<Value>>, QueryError> {
        let mut projection = Projection::new(self, columns, limit)?;
        if !projection.is_satisfied() {
            self.answer_query(&mut projection)?;
        }

        let rows = projection.into_rows();
        debug!(num_rows = rows.len(), "Query complete");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::{
        ColumnError, DynamicFileColumn, EnumerateError, Enumerator, LambdaColumn, Offsets,
    };

    #[derive(Debug, Clone)]
    struct Report {
        id: String,
        component: String,
    }

    fn report(id: &str, component: &str) -> Report {
        Report {
            id: id.to_string(),
            component: component.to_string(),
        }
    }

    /// Yields the stored reports, optionally failing after `fail_after` of them.
    struct VecSource {
        reports: Vec<Report>,
        fail_after: Option<usize>,
        visited: AtomicUsize,
    }

    impl VecSource {
        fn new(reports: Vec<Report>) -> Self {
            Self {
                reports,
                fail_after: None,
                visited: AtomicUsize::new(0),
            }
        }
    }

    impl Enumerator for VecSource {
        type Item = Report;

        fn enumerate(
            &self,
            root: &Path,
            visit: &mut dyn FnMut(&Report) -> bool,
        ) -> Result<(), EnumerateError> {
            for (idx, report) in self.reports.iter().enumerate() {
                if self.fail_after == Some(idx) {
                    return Err(EnumerateError::io(
                        root,
                        io::Error::new(io::ErrorKind::Other, "disk on fire"),
                    ));
                }

                self.visited.fetch_add(1, Ordering::SeqCst);
                if !visit(report) {
                    break;
                }
            }
            Ok(())
        }
    }

    struct TestTable {
        columns: ColumnRegistry<Report>,
        source: VecSource,
    }

    impl TestTable {
        fn new(source: VecSource) -> Result<Self, ColumnError> {
            let mut columns = ColumnRegistry::builder();
            columns
                .add_column(LambdaColumn::new(
                    "id",
                    "The ID of a crash report",
                    Offsets::identity(),
                    |r: &Report| r.id.clone(),
                ))?
                .add_column(LambdaColumn::new(
                    "component",
                    "The component that crashed",
                    Offsets::identity(),
                    |r: &Report| r.component.clone(),
                ))?
                .add_dynamic_column(DynamicFileColumn::new(
                    "file",
                    "Files related to the crash report",
                    Arc::new(|| PathBuf::from("/var/crash")),
                    |_, _, args| Some(PathBuf::from(args)),
                ))?;

            Ok(Self {
                columns: columns.build(),
                source,
            })
        }
    }

    impl Table for TestTable {
        type Entity = Report;

        fn name(&self) -> &str {
            "crashreports"
        }

        fn name_prefix(&self) -> &str {
            "crashreport_"
        }

        fn columns(&self) -> &ColumnRegistry<Report> {
            &self.columns
        }

        fn answer_query(&self, sink: &mut dyn QuerySink<Report>) -> Result<(), QueryError> {
            self.source
                .enumerate(Path::new("/var/crash"), &mut |r| sink.process_dataset(Row::new(r)))
                .map_err(|source| QueryError::Enumeration {
                    table: self.name().to_string(),
                    source,
                })
        }
    }

    fn string_row(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::String(v.to_string())).collect()
    }

    #[test]
    fn test_full_scan_in_enumerator_order() {
        let source = VecSource::new(vec![report("a1", "agent"), report("g2", "gui")]);
        let table = TestTable::new(source).unwrap();

        let specs = [ColumnSpec::from("id"), ColumnSpec::from("component")];
        let rows = table.fetch(&specs, None).unwrap();
        assert_eq!(rows, vec![string_row(&["a1", "agent"]), string_row(&["g2", "gui"])]);
    }

    #[rstest::rstest]
    #[case(1)]
    #[case(3)]
    #[case(7)]
    fn test_early_stop_bounds_visits(#[case] k: usize) {
        let reports = (0..50).map(|i| report(&format!("r{i}"), "check")).collect();
        let table = TestTable::new(VecSource::new(reports)).unwrap();

        let seen = Cell::new(0);
        let mut sink = |_row: Row<'_, Report>| {
            seen.set(seen.get() + 1);
            seen.get() < k
        };
        table.answer_query(&mut sink).unwrap();

        assert_eq!(seen.get(), k);
        assert_eq!(table.source.visited.load(Ordering::SeqCst), k);
    }

    #[test]
    fn test_limit_stops_enumeration() {
        let reports = (0..20).map(|i| report(&format!("r{i}"), "gui")).collect();
        let table = TestTable::new(VecSource::new(reports)).unwrap();

        let rows = table.fetch(&[ColumnSpec::from("id")], Some(2)).unwrap();
        assert_eq!(rows, vec![string_row(&["r0"]), string_row(&["r1"])]);
        assert_eq!(table.source.visited.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_limit_never_enumerates() {
        let table = TestTable::new(VecSource::new(vec![report("a1", "agent")])).unwrap();

        let rows = table.fetch(&[], Some(0)).unwrap();
        assert!(rows.is_empty());
        assert_eq!(table.source.visited.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_enumeration_failure_keeps_delivered_rows() {
        let mut source = VecSource::new(vec![report("a1", "agent"), report("g2", "gui")]);
        source.fail_after = Some(1);
        let table = TestTable::new(source).unwrap();

        let mut delivered = Vec::new();
        let mut sink = |row: Row<'_, Report>| {
            delivered.push(row.id.clone());
            true
        };
        let result = table.answer_query(&mut sink);

        assert!(
            matches!(result, Err(QueryError::Enumeration { ref table, .. }) if table == "crashreports"),
            "Expected enumeration error, got: {result:?}"
        );
        assert_eq!(delivered, vec!["a1".to_string()]);
    }

    #[test]
    fn test_static_column_extraction_is_pure() {
        let table = TestTable::new(VecSource::new(vec![report("a1", "agent")])).unwrap();
        let column = table.column("component").unwrap();

        let mut values = Vec::new();
        let mut sink = |row: Row<'_, Report>| {
            values.push((column.value(row), column.value(row)));
            true
        };
        table.answer_query(&mut sink).unwrap();

        assert_eq!(values.len(), 1);
        assert_eq!(values[0].0, values[0].1);
    }

    #[test]
    fn test_lookup_by_qualified_name() {
        let table = TestTable::new(VecSource::new(Vec::new())).unwrap();

        assert!(table.column("crashreport_id").is_some());
        assert!(table.column("id").is_some());
        assert!(table.dynamic_column("crashreport_file").is_some());
        assert!(table.column("crashreport_file").is_none());
        assert!(table.column("host_name").is_none());
    }

    #[test]
    fn test_dynamic_column_in_fetch() {
        let source = VecSource::new(vec![report("a1", "agent")]);
        let table = TestTable::new(source).unwrap();

        let specs = [ColumnSpec::from("id"), ColumnSpec::from("file:a1/crash.info")];
        let rows = table.fetch(&specs, None).unwrap();
        assert_eq!(rows, vec![string_row(&["a1", "/var/crash/a1/crash.info"])]);
    }

    #[test]
    fn test_erased_table_identity() {
        let table = TestTable::new(VecSource::new(Vec::new())).unwrap();
        let erased: &dyn AnyTable = &table;

        assert_eq!(erased.table_name(), "crashreports");
        assert_eq!(erased.table_prefix(), "crashreport_");
        assert_eq!(erased.schema().len(), 3);
    }
}
