mod config;
mod crash_report;

pub use self::config::HostConfig;
pub use self::crash_report::{delete_crash_report, CrashReport, CrashReportScanner};
