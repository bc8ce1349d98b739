//! Run outcome
//!
//! The uniform result handed back to the scheduler: overall status, the
//! redacted tool output, an optional short error message and one step per
//! test case found in the reports.

use chrono::{DateTime, Utc};
use lane_junit::TestStatus;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Message used when the tool ran but reported failing tests.
pub const TESTS_FAILED_MESSAGE: &str = "build failed with an exception";

/// Binary status of a run or a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Passed,
    Failed,
}

impl ExecutionStatus {
    /// Map a native report status: only `passed` passes.
    ///
    /// Skipped and errored tests count as failed.
    pub fn from_native(native: &str) -> Self {
        match native {
            "passed" => ExecutionStatus::Passed,
            _ => ExecutionStatus::Failed,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, ExecutionStatus::Passed)
    }
}

impl From<TestStatus> for ExecutionStatus {
    fn from(status: TestStatus) -> Self {
        ExecutionStatus::from_native(status.as_str())
    }
}

/// One test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// `<suite> - <test>`
    pub name: String,
    /// Reported elapsed time, human-readable (e.g. `12ms`, `1s 500ms`)
    pub duration: String,
    pub status: ExecutionStatus,
}

/// A report file that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Final result of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub execution_id: String,
    pub status: ExecutionStatus,
    /// Tool output with sensitive values redacted
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub steps: Vec<StepResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub report_warnings: Vec<ReportWarning>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn is_passed(&self) -> bool {
        self.status.is_passed()
    }

    /// Steps with the given status.
    pub fn steps_with(&self, status: ExecutionStatus) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(move |s| s.status == status)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds a [`RunOutcome`] as the run progresses.
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    status: ExecutionStatus,
    output: String,
    error_message: Option<String>,
    steps: Vec<StepResult>,
    warnings: Vec<ReportWarning>,
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultAssembler {
    pub fn new() -> Self {
        Self {
            status: ExecutionStatus::Passed,
            output: String::new(),
            error_message: None,
            steps: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// A failed result with a message and nothing else.
    pub fn failed(message: impl Into<String>) -> Self {
        let mut assembler = Self::new();
        assembler.fail(message);
        assembler
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ExecutionStatus::Failed;
        self.error_message = Some(message.into());
    }

    /// Replace the error message, keeping status, output and steps.
    pub fn override_message(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn set_output(&mut self, output: String) {
        self.output = output;
    }

    pub fn push_step(&mut self, step: StepResult) {
        self.steps.push(step);
    }

    pub fn push_warning(&mut self, warning: ReportWarning) {
        self.warnings.push(warning);
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn assemble(
        self,
        execution_id: String,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> RunOutcome {
        RunOutcome {
            execution_id,
            status: self.status,
            output: self.output,
            error_message: self.error_message,
            steps: self.steps,
            report_warnings: self.warnings,
            started_at,
            finished_at,
        }
    }
}
