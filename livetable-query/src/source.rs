use std::io;
use std::path::{Path, PathBuf};

/// Discovers the domain objects backing a table.
///
/// Implementations call `visit` once per object in an order that is
/// deterministic for a given snapshot of the source, and stop immediately
/// once `visit` returns `false`. Any resources acquired for the enumeration
/// must be released on every exit path.
pub trait Enumerator: Send + Sync {
    /// The domain object produced by this enumerator.
    type Item;

    /// Enumerates all objects found below `root`.
    fn enumerate(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(&Self::Item) -> bool,
    ) -> Result<(), EnumerateError>;
}

#[derive(Debug, thiserror::Error)]
/// An error that can occur while enumerating a table's backing source.
pub enum EnumerateError {
    #[error("Root directory does not exist: {0:?}")]
    /// The root of the source does not exist or is not a directory.
    MissingRoot(PathBuf),
    #[error("IO Error at {path:?}: {source}")]
    /// An IO error that occurred while reading the source.
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EnumerateError {
    /// Wraps an IO error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
