//! Command and argument resolution.

use std::path::Path;

use crate::config::BuildTool;
use crate::job::TestType;

/// Pick the project wrapper when it exists, otherwise the system command.
///
/// The wrapper is looked up in the project `directory` but invoked as
/// `./mvnw` relative to the run path. When a job sets a `working_dir`
/// that does not also hold the wrapper, the spawn fails and the run ends
/// as an execution failure.
///
/// Whether the system command is actually installed is not checked here;
/// a missing tool surfaces when the process is spawned.
pub fn resolve_program(tool: &BuildTool, directory: &Path) -> String {
    if directory.join(&tool.wrapper).exists() {
        format!("./{}", tool.wrapper)
    } else {
        tool.system_command.clone()
    }
}

/// Inputs to [`build_args`] beyond the job's own arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgOptions<'a> {
    /// Settings file written for this run
    pub settings: Option<&'a Path>,
    /// Value for `-Duser.home=`
    pub user_home: Option<&'a str>,
}

/// Assemble the argument vector.
///
/// Order: job args verbatim, the settings flag and path, the user home
/// property, then the goal. The goal, when present, is always last.
pub fn build_args(
    tool: &BuildTool,
    job_args: &[String],
    test_type: &TestType,
    options: ArgOptions<'_>,
) -> Vec<String> {
    let mut args = job_args.to_vec();

    if let Some(settings) = options.settings {
        args.push(tool.settings_flag.clone());
        args.push(settings.display().to_string());
    }

    if let Some(home) = options.user_home {
        args.push(format!("-Duser.home={}", home));
    }

    if let Some(goal) = test_type.goal() {
        args.push(goal.to_string());
    }

    args
}
