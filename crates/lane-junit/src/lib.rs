//! JUnit/Surefire XML report ingestion.
//!
//! Parses the XML reports written by Maven Surefire (and any other tool that
//! emits the JUnit report dialect) into suites of test cases with a native
//! status and a duration. Only the fields a results backend needs are kept:
//! suite name, test name, status and elapsed time.

mod error;
mod model;
mod parser;

pub use error::{ReportError, ReportResult};
pub use model::{Suite, TestCase, TestStatus, Totals};
pub use parser::{ingest_file, ingest_str, parse_duration};
