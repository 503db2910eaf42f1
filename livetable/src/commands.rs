use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use livetable_fs::{delete_crash_report, HostConfig};
use livetable_query::{ColumnSpec, Value};
use livetable_tables::{TableCrashReports, TableSet};
use tracing::{info, warn};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the available tables
    Tables,
    /// Describe the columns of a table
    Describe {
        /// The name of the table.
        table: String,
    },
    /// Query the rows of a table
    Query {
        /// The name of the table.
        table: String,
        #[arg(short, long = "column")]
        /// The columns to return, all static columns if none are given. {n}
        /// {n}
        /// Dynamic columns take their arguments after a `:`, for example
        /// `file:gui/<id>/crash.info`.
        columns: Vec<ColumnSpec>,
        #[arg(short, long)]
        /// The maximum number of rows to return.
        limit: Option<usize>,
        #[arg(long)]
        /// Emit the rows as JSON rather than `;` separated text.
        json: bool,
    },
    /// Print a file of a crash report
    Cat {
        /// The ID of the crash report.
        id: String,
        #[arg(default_value = "crash.info")]
        /// The file within the crash report directory.
        file: String,
    },
    /// Delete a crash report
    Delete {
        /// The ID of the crash report.
        id: String,
    },
}

impl Commands {
    /// Executes the command
    pub fn execute(self, config: Arc<HostConfig>) -> Result<()> {
        match self {
            Commands::Tables => {
                let tables = TableSet::new(config).context("Create tables")?;
                for table in tables.tables() {
                    println!("{}", table.table_name());
                }
            },
            Commands::Describe { table } => {
                let tables = TableSet::new(config).context("Create tables")?;
                let table = tables
                    .get(&table)
                    .ok_or_else(|| anyhow!("Unknown table: {table:?}"))?;

                for column in table.schema() {
                    let suffix = if column.dynamic { ":<arguments>" } else { "" };
                    println!(
                        "{}{suffix};{};{}",
                        column.name, column.kind, column.description
                    );
                }
            },
            Commands::Query {
                table,
                columns,
                limit,
                json,
            } => {
                let tables = TableSet::new(config).context("Create tables")?;
                let target = tables
                    .get(&table)
                    .ok_or_else(|| anyhow!("Unknown table: {table:?}"))?;

                let rows = target.fetch(&columns, limit).inspect_err(|e| {
                    warn!(error = %e, table = %table, "Query failed");
                })?;
                print_rows(&rows, json)?;
            },
            Commands::Cat { id, file } => {
                let table = TableCrashReports::new(config).context("Create crash report table")?;
                let contents = table
                    .read_file(&id, &file)?
                    .ok_or_else(|| anyhow!("No file {file:?} for crash report {id:?}"))?;
                std::io::stdout().write_all(&contents)?;
            },
            Commands::Delete { id } => {
                let root = config.crash_report_path();
                let removed = delete_crash_report(&root, &id)
                    .with_context(|| format!("Delete crash report {id:?}"))?;

                if removed == 0 {
                    return Err(anyhow!("No crash report with ID {id:?}"));
                }
                info!(id = %id, removed = removed, "Deleted crash report");
            },
        }

        Ok(())
    }
}

fn print_rows(rows: &[Vec<Value>], json: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    if json {
        serde_json::to_writer(&mut stdout, rows).context("Serialize rows")?;
        writeln!(stdout)?;
        return Ok(());
    }

    for row in rows {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(";");
        writeln!(stdout, "{line}")?;
    }

    Ok(())
}
