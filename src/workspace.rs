//! Workspace resolution
//!
//! Checkouts live under `<data_dir>/repo/<repository.path>`. The project
//! directory must hold the build descriptor; the tool may run from a
//! different directory when the job sets `working_dir`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::BuildTool;
use crate::error::{LaneError, LaneResult};
use crate::job::Repository;

/// Subdirectory of the data directory holding checkouts.
pub const REPO_DIR: &str = "repo";

/// Fail with `WorkspaceMissing` when the data directory does not exist.
pub fn ensure_data_dir(data_dir: &Path) -> LaneResult<()> {
    match fs::metadata(data_dir) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(LaneError::WorkspaceMissing(data_dir.to_path_buf()))
        }
        _ => Ok(()),
    }
}

/// Resolved directories for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Project directory: descriptor, wrapper, settings and reports live here
    pub directory: PathBuf,
    /// Directory the tool is started in
    pub run_path: PathBuf,
}

impl Workspace {
    pub fn locate(data_dir: &Path, repository: &Repository) -> Self {
        let checkouts = data_dir.join(REPO_DIR);
        let directory = checkouts.join(&repository.path);
        let run_path = match repository.working_dir.as_deref() {
            Some(dir) if !dir.is_empty() => checkouts.join(dir),
            _ => directory.clone(),
        };
        Self {
            directory,
            run_path,
        }
    }

    /// Fail with `ProjectFileMissing` unless the build descriptor exists.
    pub fn ensure_descriptor(&self, tool: &BuildTool) -> LaneResult<PathBuf> {
        let descriptor = self.directory.join(&tool.descriptor);
        if descriptor.exists() {
            Ok(descriptor)
        } else {
            Err(LaneError::ProjectFileMissing {
                descriptor: tool.descriptor.clone(),
                directory: self.directory.clone(),
            })
        }
    }

    /// Where the tool leaves its XML reports.
    pub fn report_dir(&self, tool: &BuildTool) -> PathBuf {
        self.directory.join(&tool.report_dir)
    }
}
