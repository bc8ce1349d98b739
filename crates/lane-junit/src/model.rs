//! Report model types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Native status of a single test case as written in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Error,
    Skipped,
}

impl TestStatus {
    /// The lowercase status string used by report consumers.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Error => "error",
            TestStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `<testcase>` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Test method name
    pub name: String,
    /// Fully qualified class name, when the report carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classname: Option<String>,
    /// Reported elapsed time
    pub duration: Duration,
    /// Native status
    pub status: TestStatus,
    /// Failure or error message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A `<testsuite>` with its direct test cases, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    pub tests: Vec<TestCase>,
}

/// Per-status counts for a suite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub error: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl Suite {
    /// Count test cases by status and sum their durations.
    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for test in &self.tests {
            totals.tests += 1;
            totals.duration += test.duration;
            match test.status {
                TestStatus::Passed => totals.passed += 1,
                TestStatus::Failed => totals.failed += 1,
                TestStatus::Error => totals.error += 1,
                TestStatus::Skipped => totals.skipped += 1,
            }
        }
        totals
    }
}
