use std::sync::Arc;

use livetable_fs::{CrashReport, CrashReportScanner, HostConfig};
use livetable_query::{
    ArgumentPolicy, ColumnError, ColumnRegistry, DynamicFileColumn, Enumerator, LambdaColumn,
    Offsets, QueryError, QuerySink, Row, Table,
};
use tracing::debug;

/// The crash reports recorded by the monitoring components.
///
/// | column      | type   | description                                           |
/// | ----------- | ------ | ----------------------------------------------------- |
/// | `id`        | string | The ID of a crash report                              |
/// | `component` | string | The component that crashed (gui, agent, check, etc.)  |
/// | `file:path` | string | Files related to the crash report (crash.info, etc.)  |
///
/// `file` arguments are resolved relative to the host's crash report path,
/// e.g. `file:gui/<id>/crash.info`.
pub struct TableCrashReports<E = CrashReportScanner> {
    config: Arc<HostConfig>,
    columns: ColumnRegistry<CrashReport>,
    files: Arc<DynamicFileColumn<CrashReport>>,
    enumerator: E,
}

impl TableCrashReports {
    /// Creates the table reading crash reports from disk.
    pub fn new(config: Arc<HostConfig>) -> Result<Self, ColumnError> {
        Self::with_enumerator(config, CrashReportScanner)
    }
}

impl<E> TableCrashReports<E>
where
    E: Enumerator<Item = CrashReport>,
{
    /// Creates the table reading crash reports from the given enumerator.
    pub fn with_enumerator(config: Arc<HostConfig>, enumerator: E) -> Result<Self, ColumnError> {
        let base_path = {
            let config = config.clone();
            Arc::new(move || config.crash_report_path())
        };
        let policy = if config.strict_file_arguments() {
            ArgumentPolicy::Normalized
        } else {
            ArgumentPolicy::Permissive
        };

        let files = Arc::new(
            DynamicFileColumn::new(
                "file",
                "Files related to the crash report (crash.info, etc.)",
                base_path,
                |_, _, args| Some(args.into()),
            )
            .with_policy(policy),
        );

        let mut columns = ColumnRegistry::builder();
        columns
            .add_column(LambdaColumn::new(
                "id",
                "The ID of a crash report",
                Offsets::identity(),
                |r: &CrashReport| r.id.clone(),
            ))?
            .add_column(LambdaColumn::new(
                "component",
                "The component that crashed (gui, agent, check, etc.)",
                Offsets::identity(),
                |r: &CrashReport| r.component.clone(),
            ))?
            .add_dynamic_column(files.clone())?;

        Ok(Self {
            config,
            columns: columns.build(),
            files,
            enumerator,
        })
    }

    /// Reads a file belonging to the crash report with the given ID.
    ///
    /// Every report with the ID is checked until one has the file. Returns
    /// `None` if no report has the ID or none of them has the file.
    pub fn read_file(&self, id: &str, file: &str) -> Result<Option<Vec<u8>>, QueryError> {
        let mut contents = None;
        let mut rejected = None;
        let mut sink = |row: Row<'_, CrashReport>| {
            if row.id != id {
                return true;
            }

            let arguments = row.relative_path().join(file);
            match self.files.file_column(&arguments.to_string_lossy()) {
                Ok(column) => {
                    contents = column.contents(row);
                    contents.is_none()
                },
                Err(e) => {
                    rejected = Some(e);
                    false
                },
            }
        };
        self.answer_query(&mut sink)?;

        if let Some(e) = rejected {
            debug!(error = %e, id = %id, "Rejected crash report file");
            return Err(QueryError::Column(e));
        }

        Ok(contents)
    }
}

impl<E> Table for TableCrashReports<E>
where
    E: Enumerator<Item = CrashReport>,
{
    type Entity = CrashReport;

    fn name(&self) -> &str {
        "crashreports"
    }

    fn name_prefix(&self) -> &str {
        "crashreport_"
    }

    fn columns(&self) -> &ColumnRegistry<CrashReport> {
        &self.columns
    }

    fn answer_query(&self, sink: &mut dyn QuerySink<CrashReport>) -> Result<(), QueryError> {
        let root = self.config.crash_report_path();
        debug!(table = self.name(), root = %root.display(), "Enumerating crash reports");

        self.enumerator
            .enumerate(&root, &mut |report| sink.process_dataset(Row::new(report)))
            .map_err(|source| QueryError::Enumeration {
                table: self.name().to_string(),
                source,
            })
    }
}
