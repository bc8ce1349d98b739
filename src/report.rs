//! Report collection
//!
//! Walks the tool's report directory in file-name order and turns every
//! test case of every `.xml` report into a [`StepResult`]. A report that
//! fails to parse becomes a [`ReportWarning`] and contributes no steps; a
//! failure to walk the directory itself is an error.

use std::ffi::OsStr;
use std::path::Path;

use lane_junit::{ingest_file, Suite};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{LaneError, LaneResult};
use crate::outcome::{ExecutionStatus, ReportWarning, ResultAssembler, StepResult};

/// Collect steps from `report_dir` into `assembler`.
///
/// Steps found before a walk error are kept.
pub fn collect_reports(report_dir: &Path, assembler: &mut ResultAssembler) -> LaneResult<()> {
    for entry in WalkDir::new(report_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| LaneError::ReportCollectionFailed {
            path: report_dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        if entry.file_type().is_dir() || path.extension() != Some(OsStr::new("xml")) {
            continue;
        }

        match ingest_file(path) {
            Ok(suites) => {
                for suite in &suites {
                    let totals = suite.totals();
                    debug!(
                        report = %path.display(),
                        suite = %suite.name,
                        tests = totals.tests,
                        passed = totals.passed,
                        "report suite"
                    );
                    push_suite(suite, assembler);
                }
            }
            Err(e) => {
                warn!(report = %path.display(), error = %e, "skipping unreadable report");
                assembler.push_warning(ReportWarning {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn push_suite(suite: &Suite, assembler: &mut ResultAssembler) {
    for test in &suite.tests {
        assembler.push_step(StepResult {
            name: format!("{} - {}", suite.name, test.name),
            duration: humantime::format_duration(test.duration).to_string(),
            status: ExecutionStatus::from(test.status),
        });
    }
}
