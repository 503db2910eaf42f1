//! The tables served by livetable.

mod crash_reports;
mod table_set;

pub use self::crash_reports::TableCrashReports;
pub use self::table_set::{TableSet, TableSetError};
