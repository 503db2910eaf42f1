use std::fs;
use std::path::{Path, PathBuf};

use livetable_query::{EnumerateError, Enumerator};
use tracing::{info, instrument, trace};

#[derive(Debug, Clone, Eq, PartialEq)]
/// A crash report recorded by one of the monitoring components.
pub struct CrashReport {
    /// The ID of the report, the name of its directory.
    pub id: String,
    /// The component that crashed, e.g. `gui`, `agent` or `check`.
    pub component: String,
}

impl CrashReport {
    /// The path of the report's directory relative to the crash report root.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.component).join(&self.id)
    }
}

/// Scans the crash report directory.
///
/// Crash reports are laid out on disk as:
///
/// ```text
/// root/
/// ├── agent/
/// │   └── 2f1c1b9e-5d6a-11ef-9c4b-0242ac120002/
/// │       └── crash.info
/// └── gui/
///     └── 7a0e4b02-5d6a-11ef-9c4b-0242ac120002/
///         └── crash.info
/// ```
///
/// Both levels are visited in lexicographic order, anything that is not a
/// directory is skipped.
#[derive(Debug, Default, Copy, Clone)]
pub struct CrashReportScanner;

impl Enumerator for CrashReportScanner {
    type Item = CrashReport;

    #[instrument(skip(self, visit))]
    fn enumerate(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(&CrashReport) -> bool,
    ) -> Result<(), EnumerateError> {
        if !root.is_dir() {
            return Err(EnumerateError::MissingRoot(root.to_path_buf()));
        }

        for component_dir in sorted_dirs(root)? {
            let Some(component) = file_name(&component_dir) else {
                continue;
            };

            for report_dir in sorted_dirs(&component_dir)? {
                let Some(id) = file_name(&report_dir) else {
                    continue;
                };

                let report = CrashReport {
                    id,
                    component: component.clone(),
                };
                if !visit(&report) {
                    trace!("Enumeration stopped by visitor");
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}

/// Deletes every crash report with the given ID.
///
/// Reports are located by scanning the directory, so an ID can only ever
/// remove a report directory below `root`. Returns the number of reports
/// removed.
#[instrument]
pub fn delete_crash_report(root: &Path, id: &str) -> Result<usize, EnumerateError> {
    let mut matches = Vec::new();
    CrashReportScanner.enumerate(root, &mut |report| {
        if report.id == id {
            matches.push(report.relative_path());
        }
        true
    })?;

    for relative in &matches {
        let path = root.join(relative);
        info!(path = %path.display(), "Deleting crash report");
        fs::remove_dir_all(&path).map_err(|e| EnumerateError::io(&path, e))?;
    }

    Ok(matches.len())
}

/// Lists the directories directly below `path` sorted by name.
///
/// The directory handle is released before this returns.
fn sorted_dirs(path: &Path) -> Result<Vec<PathBuf>, EnumerateError> {
    let entries = fs::read_dir(path).map_err(|e| EnumerateError::io(path, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| EnumerateError::io(path, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| EnumerateError::io(entry.path(), e))?;

        if file_type.is_dir() {
            dirs.push(entry.path());
        } else {
            trace!(path = %entry.path().display(), "Skipping non-directory entry");
        }
    }

    dirs.sort();
    Ok(dirs)
}

fn file_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str();
    if name.is_none() {
        trace!(path = %path.display(), "Skipping entry with non UTF-8 name");
    }
    name.map(str::to_string)
}
