//! Job runner
//!
//! Drives one job end to end: workspace and descriptor checks, command and
//! argument resolution, settings materialization, the tool invocation,
//! output redaction and report collection. Validation failures that the
//! scheduler should see as a failed run are folded into the [`RunOutcome`];
//! only fatal errors (see [`LaneError::is_fatal`]) are returned as `Err`.

use chrono::Utc;
use tracing::{debug, error, info, info_span, warn};
use ulid::Ulid;

use crate::command::{build_args, resolve_program, ArgOptions};
use crate::config::LaneConfig;
use crate::env::EnvOverlay;
use crate::error::{LaneError, LaneResult};
use crate::job::Job;
use crate::outcome::{ResultAssembler, RunOutcome, TESTS_FAILED_MESSAGE};
use crate::process::{Execution, Invocation, ProcessRunner, SystemRunner};
use crate::redact::Redactor;
use crate::report::collect_reports;
use crate::settings::write_settings;
use crate::state::{RunProgress, RunState};
use crate::workspace::{ensure_data_dir, Workspace};

/// Runs jobs against a configured build tool.
#[derive(Debug, Clone)]
pub struct MavenRunner<R = SystemRunner> {
    config: LaneConfig,
    process: R,
}

impl MavenRunner<SystemRunner> {
    pub fn new(config: LaneConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: ProcessRunner> MavenRunner<R> {
    /// Runner with a custom process backend.
    pub fn with_runner(config: LaneConfig, process: R) -> Self {
        Self { config, process }
    }

    pub fn config(&self) -> &LaneConfig {
        &self.config
    }

    pub fn process(&self) -> &R {
        &self.process
    }

    /// Run a job to completion.
    ///
    /// The execution id is the job's own id when set, otherwise a fresh ULID.
    pub fn run(&self, job: &Job) -> LaneResult<RunOutcome> {
        let execution_id = job
            .id
            .clone()
            .unwrap_or_else(|| Ulid::new().to_string());
        let span = info_span!("run", execution_id = %execution_id);
        let _guard = span.enter();

        let started_at = Utc::now();
        let mut progress = RunProgress::new();

        let assembler = match self.execute(job, &mut progress) {
            Ok(assembler) => assembler,
            Err(e) if e.is_fatal() => {
                error!(error = %e, state = ?progress.state(), "run aborted");
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, state = ?progress.state(), "run failed early");
                ResultAssembler::failed(e.to_string())
            }
        };

        progress.advance(RunState::Assembled)?;
        let outcome = assembler.assemble(execution_id, started_at, Utc::now());
        info!(
            status = ?outcome.status,
            steps = outcome.steps.len(),
            warnings = outcome.report_warnings.len(),
            "run finished"
        );
        debug!(states = ?progress.history(), "run path");
        Ok(outcome)
    }

    fn execute(&self, job: &Job, progress: &mut RunProgress) -> LaneResult<ResultAssembler> {
        let tool = &self.config.tool;

        ensure_data_dir(&self.config.data_dir)?;
        progress.advance(RunState::WorkspaceChecked)?;

        let repository = job
            .content
            .repository()
            .ok_or(LaneError::UnsupportedContent)?;
        progress.advance(RunState::ContentValidated)?;

        let workspace = Workspace::locate(&self.config.data_dir, repository);
        workspace.ensure_descriptor(tool)?;
        progress.advance(RunState::ProjectFileValidated)?;

        let program = resolve_program(tool, &workspace.directory);
        // parsed before anything is written to the workspace
        let test_type = job.test_type()?;
        progress.advance(RunState::CommandResolved)?;

        let settings = match job.settings_payload() {
            Some(payload) => {
                let file = write_settings(tool, &workspace.directory, payload)?;
                info!(path = %file.path.display(), sha256 = %file.sha256, "settings written");
                progress.advance(RunState::SettingsWritten)?;
                Some(file)
            }
            None => None,
        };

        let options = ArgOptions {
            settings: settings.as_ref().map(|f| f.path.as_path()),
            user_home: self.config.user_home_override.as_deref(),
        };
        let invocation = Invocation {
            program,
            args: build_args(tool, &job.args, &test_type, options),
            cwd: workspace.run_path.clone(),
            env: EnvOverlay::for_job(&job.variables, &tool.unset_env),
        };

        let redactor = Redactor::for_variables(&tool.redaction_placeholder, &job.variables);
        info!(
            tool = %tool.name,
            command = %redactor.redact_str(&invocation.command_line()),
            cwd = %invocation.cwd.display(),
            test_type = %test_type,
            env_set = %invocation.env.keys().collect::<Vec<_>>().join(","),
            env_removed = %invocation.env.removed_keys().collect::<Vec<_>>().join(","),
            "starting build"
        );

        let result = self.process.run(&invocation);
        progress.advance(RunState::Executed)?;

        let mut assembler = ResultAssembler::new();
        match result.exit.classify(&tool.graceful_exit_codes) {
            Execution::Failed { message } => {
                error!(error = %message, "build tool failed to run");
                return Ok(ResultAssembler::failed(message));
            }
            Execution::TestsFailed { code } => {
                warn!(code, "build finished with failing tests");
                assembler.fail(TESTS_FAILED_MESSAGE);
            }
            Execution::Succeeded => info!("build succeeded"),
        }
        assembler.set_output(String::from_utf8_lossy(&redactor.redact(&result.output)).into_owned());

        let report_dir = workspace.report_dir(tool);
        match collect_reports(&report_dir, &mut assembler) {
            Ok(()) => {
                info!(steps = assembler.step_count(), "reports collected");
                progress.advance(RunState::ReportsCollected)?;
            }
            Err(e) => {
                warn!(error = %e, "report collection failed");
                assembler.override_message(e.to_string());
            }
        }

        Ok(assembler)
    }
}
