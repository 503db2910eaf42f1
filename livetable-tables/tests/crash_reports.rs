use std::fs;
use std::path::Path;
use std::sync::Arc;

use livetable_fs::HostConfig;
use livetable_query::{ColumnError, ColumnSpec, QueryError, Value};
use livetable_tables::{TableCrashReports, TableSet};

fn write_report(root: &Path, component: &str, id: &str, contents: &str) {
    let dir = root.join(component).join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("crash.info"), contents).unwrap();
}

fn setup() -> (tempfile::TempDir, Arc<HostConfig>) {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), "agent", "a1", r#"{"crash_type": "agent"}"#);
    write_report(dir.path(), "gui", "g2", r#"{"crash_type": "gui"}"#);

    let config = Arc::new(HostConfig::builder().crash_report_path(dir.path()).build());
    (dir, config)
}

#[test]
fn test_query_reports_on_disk() {
    let (_dir, config) = setup();
    let tables = TableSet::new(config).unwrap();
    let table = tables.get("crashreports").unwrap();

    let rows = table
        .fetch(&[ColumnSpec::from("id"), ColumnSpec::from("component")], None)
        .unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Value::String("a1".into()), Value::String("agent".into())],
            vec![Value::String("g2".into()), Value::String("gui".into())],
        ]
    );
}

#[test]
fn test_file_column_on_disk() {
    let (dir, config) = setup();
    let tables = TableSet::new(config).unwrap();
    let table = tables.get("crashreports").unwrap();

    let rows = table
        .fetch(&[ColumnSpec::from("file:agent/a1/crash.info")], Some(1))
        .unwrap();
    let expected = dir.path().join("agent/a1/crash.info");
    assert_eq!(rows, vec![vec![Value::String(expected.to_string_lossy().into_owned())]]);
}

#[rstest::rstest]
#[case("g2", "crash.info", Some(r#"{"crash_type": "gui"}"#))]
#[case("a1", "crash.info", Some(r#"{"crash_type": "agent"}"#))]
#[case("g2", "missing.info", None)]
#[case("x9", "crash.info", None)]
fn test_read_file(#[case] id: &str, #[case] file: &str, #[case] expected: Option<&str>) {
    let (_dir, config) = setup();
    let table = TableCrashReports::new(config).unwrap();

    let contents = table.read_file(id, file).unwrap();
    assert_eq!(contents.as_deref(), expected.map(str::as_bytes));
}

#[test]
fn test_read_file_checks_every_report_with_id() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("agent/a1")).unwrap();
    write_report(dir.path(), "gui", "a1", "gui");

    let config = Arc::new(HostConfig::builder().crash_report_path(dir.path()).build());
    let table = TableCrashReports::new(config).unwrap();

    let contents = table.read_file("a1", "crash.info").unwrap();
    assert_eq!(contents.as_deref(), Some(b"gui".as_slice()));
}

#[rstest::rstest]
#[case("../../../etc/passwd")]
#[case("./crash.info")]
#[case("")]
fn test_read_file_strict_rejects_argument(#[case] file: &str) {
    let (dir, _) = setup();
    let config = Arc::new(
        HostConfig::builder()
            .crash_report_path(dir.path())
            .strict_file_arguments(true)
            .build(),
    );
    let table = TableCrashReports::new(config).unwrap();

    let result = table.read_file("a1", file);
    assert!(
        matches!(result, Err(QueryError::Column(ColumnError::InvalidArgument { .. }))),
        "Expected invalid argument error, got: {result:?}"
    );
}

#[test]
fn test_read_file_strict_accepts_plain_file() {
    let (dir, _) = setup();
    let config = Arc::new(
        HostConfig::builder()
            .crash_report_path(dir.path())
            .strict_file_arguments(true)
            .build(),
    );
    let table = TableCrashReports::new(config).unwrap();

    let contents = table.read_file("a1", "crash.info").unwrap();
    assert_eq!(contents.as_deref(), Some(br#"{"crash_type": "agent"}"#.as_slice()));
}

#[test]
fn test_missing_crash_directory_is_an_error() {
    let (dir, config) = setup();
    config.set_crash_report_path(dir.path().join("gone"));
    let tables = TableSet::new(config).unwrap();

    let result = tables.get("crashreports").unwrap().fetch(&[], None);
    assert!(
        matches!(result, Err(QueryError::Enumeration { .. })),
        "Expected enumeration error, got: {result:?}"
    );
}
