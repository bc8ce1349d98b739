//! maven-lane - Maven build/test execution adapter
//!
//! Given a [`Job`] describing a checkout, build arguments, environment
//! variables and a test-type selector, this crate runs Maven in the
//! prepared workspace and turns the Surefire XML reports it leaves behind
//! into a uniform [`RunOutcome`].

pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod job;
pub mod mock;
pub mod outcome;
pub mod process;
pub mod redact;
pub mod report;
pub mod runner;
pub mod settings;
pub mod state;
pub mod workspace;

pub use config::{BuildTool, ConfigError, EffectiveConfig, LaneConfig};
pub use error::{LaneError, LaneResult};
pub use job::{Content, Job, Repository, TestType, Variable, Variables};
pub use mock::MockRunner;
pub use outcome::{ExecutionStatus, ReportWarning, RunOutcome, StepResult};
pub use process::{ExitKind, Invocation, ProcessOutput, ProcessRunner, SystemRunner};
pub use runner::MavenRunner;
pub use state::{RunProgress, RunState};
