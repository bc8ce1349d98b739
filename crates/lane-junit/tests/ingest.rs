//! Ingestion of on-disk Surefire reports.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lane_junit::{ingest_file, ReportError, TestStatus};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_ingest_surefire_report() {
    let suites = ingest_file(&fixture("TEST-hello.maven.LibraryTest.xml")).unwrap();
    assert_eq!(suites.len(), 1);

    let suite = &suites[0];
    assert_eq!(suite.name, "hello.maven.LibraryTest");
    assert_eq!(suite.tests.len(), 2);

    let passed = &suite.tests[0];
    assert_eq!(passed.name, "someLibraryMethodReturnsTrue");
    assert_eq!(passed.status, TestStatus::Passed);
    assert_eq!(passed.duration, Duration::from_millis(17));

    let failed = &suite.tests[1];
    assert_eq!(failed.status, TestStatus::Failed);
    assert!(failed
        .message
        .as_deref()
        .unwrap()
        .starts_with("someLibraryMethod should return 'false'"));
}

#[test]
fn test_ingest_missing_file() {
    let err = ingest_file(&fixture("does-not-exist.xml")).unwrap_err();
    match err {
        ReportError::Read { path, .. } => assert!(path.ends_with("does-not-exist.xml")),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn test_status_serializes_lowercase() {
    let json = serde_json::to_string(&TestStatus::Skipped).unwrap();
    assert_eq!(json, "\"skipped\"");
    assert_eq!(TestStatus::Error.to_string(), "error");
}
