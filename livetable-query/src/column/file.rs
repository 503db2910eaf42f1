//! Dynamic columns resolving to files below a host supplied base directory.

use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

use tracing::{trace, warn};

use super::{BasePath, Column, DynamicColumn};
use crate::error::ColumnError;
use crate::{ColumnType, Row, Value};

/// Resolves a file path relative to the base path for a given row and arguments.
///
/// The resolver receives the column family it belongs to, the row being read
/// and the raw argument string from the query.
pub type FileResolver<T> =
    Box<dyn Fn(&dyn DynamicColumn<T>, Row<'_, T>, &str) -> Option<PathBuf> + Send + Sync>;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
/// How the arguments of a dynamic file column are checked before
/// a column is built from them.
pub enum ArgumentPolicy {
    #[default]
    /// Arguments are handed to the resolver unchanged.
    ///
    /// This includes empty arguments, absolute paths and `..` components,
    /// which can address files outside the base path.
    Permissive,
    /// Arguments must be a relative path in normal form: no empty,
    /// `.` or `..` components and no leading or trailing `/`.
    Normalized,
}

/// A dynamic column family whose columns produce file paths.
///
/// `file:a1/crash.info` against a base path of `/var/crash` produces
/// `/var/crash/a1/crash.info`, given the resolver passes the argument through.
pub struct DynamicFileColumn<T> {
    name: String,
    description: String,
    base_path: BasePath,
    resolver: FileResolver<T>,
    policy: ArgumentPolicy,
}

impl<T> DynamicFileColumn<T> {
    /// Creates a new dynamic file column.
    pub fn new<R>(
        name: impl Into<String>,
        description: impl Into<String>,
        base_path: BasePath,
        resolver: R,
    ) -> Self
    where
        R: Fn(&dyn DynamicColumn<T>, Row<'_, T>, &str) -> Option<PathBuf> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            base_path,
            resolver: Box::new(resolver),
            policy: ArgumentPolicy::default(),
        }
    }

    /// Sets the [ArgumentPolicy] applied when building columns.
    pub fn with_policy(mut self, policy: ArgumentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the active [ArgumentPolicy].
    pub fn policy(&self) -> ArgumentPolicy {
        self.policy
    }

    /// Returns the current base path.
    ///
    /// This calls the supplier every time.
    pub fn base_path(&self) -> PathBuf {
        (self.base_path)()
    }

    /// Builds the concrete [FileColumn] for the given arguments.
    pub fn file_column(&self, arguments: &str) -> Result<FileColumn<'_, T>, ColumnError> {
        self.check_arguments(arguments)?;

        Ok(FileColumn {
            name: format!("{}:{}", self.name, arguments),
            family: self,
            arguments: arguments.to_string(),
        })
    }

    fn check_arguments(&self, arguments: &str) -> Result<(), ColumnError> {
        if self.policy == ArgumentPolicy::Permissive {
            return Ok(());
        }

        let not_normal = arguments
            .split('/')
            .any(|part| part.is_empty() || part == "." || part == "..");
        if not_normal {
            return Err(ColumnError::InvalidArgument {
                column: self.name.clone(),
                arguments: arguments.to_string(),
                reason: "path must be relative and in normal form",
            });
        }

        Ok(())
    }
}

impl<T> DynamicColumn<T> for DynamicFileColumn<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn kind(&self) -> ColumnType {
        ColumnType::String
    }

    fn make_column(&self, arguments: &str) -> Result<Box<dyn Column<T> + '_>, ColumnError> {
        let column = self.file_column(arguments)?;
        Ok(Box::new(column))
    }
}

impl<T> Debug for DynamicFileColumn<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicFileColumn")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// A column of a [DynamicFileColumn] family bound to one argument string.
pub struct FileColumn<'a, T> {
    name: String,
    family: &'a DynamicFileColumn<T>,
    arguments: String,
}

impl<T> FileColumn<'_, T> {
    /// Resolves the file path for the given row.
    ///
    /// Returns `None` if the resolver cannot resolve the arguments for this row.
    pub fn path(&self, row: Row<'_, T>) -> Option<PathBuf> {
        let relative = (self.family.resolver)(self.family, row, &self.arguments)?;
        Some(self.family.base_path().join(relative))
    }

    /// Reads the contents of the resolved file.
    ///
    /// Returns `None` if the base path does not exist, the arguments do not
    /// resolve or the resolved path is not a regular file.
    pub fn contents(&self, row: Row<'_, T>) -> Option<Vec<u8>> {
        let base_path = self.family.base_path();
        if !base_path.exists() {
            trace!(base_path = %base_path.display(), "Base path does not exist");
            return None;
        }

        let relative = (self.family.resolver)(self.family, row, &self.arguments)?;
        let path = base_path.join(relative);
        if !path.is_file() {
            trace!(path = %path.display(), "Resolved path is not a regular file");
            return None;
        }

        match std::fs::read(&path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to read file");
                None
            },
        }
    }
}

impl<T> Column<T> for FileColumn<'_, T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.family.description
    }

    fn kind(&self) -> ColumnType {
        ColumnType::String
    }

    fn value(&self, row: Row<'_, T>) -> Value {
        match self.path(row) {
            Some(path) => Value::String(path.to_string_lossy().into_owned()),
            None => Value::neutral(ColumnType::String),
        }
    }
}
