use std::path::PathBuf;

use bon::Builder;
use parking_lot::RwLock;
use tracing::info;

#[derive(Debug, Builder)]
/// Configuration of the host the tables are running in.
///
/// Tables hold on to a shared handle of the config and read it whenever
/// they need a value, so changes made at runtime are observed by the
/// next query without rebuilding any table.
pub struct HostConfig {
    #[builder(with = |path: impl Into<PathBuf>| RwLock::new(path.into()))]
    /// The directory crash reports are stored in.
    ///
    /// Reports are laid out as `<crash_report_path>/<component>/<id>/`.
    crash_report_path: RwLock<PathBuf>,
    #[builder(default)]
    /// Reject arguments of dynamic file columns that are not a relative
    /// path in normal form.
    strict_file_arguments: bool,
}

impl HostConfig {
    /// Returns the current crash report directory.
    pub fn crash_report_path(&self) -> PathBuf {
        self.crash_report_path.read().clone()
    }

    /// Changes the crash report directory.
    pub fn set_crash_report_path(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        info!(path = %path.display(), "Updating crash report path");
        *self.crash_report_path.write() = path;
    }

    /// If dynamic file column arguments are checked for normal form.
    pub fn strict_file_arguments(&self) -> bool {
        self.strict_file_arguments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = HostConfig::builder()
            .crash_report_path("/var/crash")
            .build();
        assert_eq!(config.crash_report_path(), PathBuf::from("/var/crash"));
        assert!(!config.strict_file_arguments());
    }

    #[test]
    fn test_update_crash_report_path() {
        let config = HostConfig::builder()
            .crash_report_path("/var/crash")
            .strict_file_arguments(true)
            .build();

        config.set_crash_report_path("/srv/crashes");
        assert_eq!(config.crash_report_path(), PathBuf::from("/srv/crashes"));
        assert!(config.strict_file_arguments());
    }
}
