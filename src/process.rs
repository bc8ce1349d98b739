//! Build tool process execution
//!
//! The tool runs synchronously with stdout and stderr captured into one
//! byte stream. No timeout is applied; stopping a runaway build is left to
//! whoever owns the process tree.

use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::warn;

use crate::env::EnvOverlay;

/// A fully resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory of the child
    pub cwd: PathBuf,
    pub env: EnvOverlay,
}

impl Invocation {
    /// Program and arguments joined for logging.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// How the child ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitKind {
    /// Exited with a code
    Code(i32),
    /// Killed by a signal (Unix)
    Signal(i32),
    /// Could not be started or waited on
    SpawnFailed(String),
}

impl ExitKind {
    fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitKind::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitKind::Signal(signal);
            }
        }
        ExitKind::SpawnFailed(format!("process ended without exit code: {}", status))
    }

    /// Human-readable description, used verbatim as the error message of
    /// an execution failure.
    pub fn describe(&self) -> String {
        match self {
            ExitKind::Code(code) => format!("exit status {}", code),
            ExitKind::Signal(signal) => format!("signal: {}", signal),
            ExitKind::SpawnFailed(message) => message.clone(),
        }
    }

    /// Classify against the tool's graceful exit codes.
    pub fn classify(&self, graceful_exit_codes: &[i32]) -> Execution {
        match self {
            ExitKind::Code(0) => Execution::Succeeded,
            ExitKind::Code(code) if graceful_exit_codes.contains(code) => {
                Execution::TestsFailed { code: *code }
            }
            other => Execution::Failed {
                message: other.describe(),
            },
        }
    }
}

/// Tri-state result of running the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    /// Zero exit
    Succeeded,
    /// The tool ran to completion but reported failing tests
    TestsFailed { code: i32 },
    /// The tool could not run: missing, crashed or killed
    Failed { message: String },
}

/// Captured output plus how the child ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Interleaved stdout and stderr
    pub output: Vec<u8>,
    pub exit: ExitKind,
}

/// Runs an invocation to completion.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> ProcessOutput;
}

/// Spawns real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> ProcessOutput {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        invocation.env.apply(&mut command);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ProcessOutput {
                    output: Vec::new(),
                    exit: ExitKind::SpawnFailed(format!(
                        "failed to start {}: {}",
                        invocation.program, e
                    )),
                }
            }
        };

        let sink = Arc::new(Mutex::new(Vec::new()));
        let readers = spawn_readers(&mut child, &sink);

        let exit = match child.wait() {
            Ok(status) => ExitKind::from_status(status),
            Err(e) => ExitKind::SpawnFailed(format!(
                "failed to wait for {}: {}",
                invocation.program, e
            )),
        };

        for reader in readers {
            if reader.join().is_err() {
                warn!(program = %invocation.program, "output reader panicked; capture may be incomplete");
            }
        }

        let output = match Arc::try_unwrap(sink) {
            Ok(buffer) => buffer.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared
                .lock()
                .map(|buffer| buffer.to_vec())
                .unwrap_or_default(),
        };

        ProcessOutput { output, exit }
    }
}

/// Copy stdout and stderr into the shared sink as chunks arrive.
fn spawn_readers(child: &mut Child, sink: &Arc<Mutex<Vec<u8>>>) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    if let Some(stdout) = child.stdout.take() {
        handles.push(spawn_reader(stdout, Arc::clone(sink)));
    }
    if let Some(stderr) = child.stderr.take() {
        handles.push(spawn_reader(stderr, Arc::clone(sink)));
    }

    handles
}

fn spawn_reader<R: Read + Send + 'static>(source: R, sink: Arc<Mutex<Vec<u8>>>) -> JoinHandle<()> {
    thread::spawn(move || pump(source, &sink))
}

/// Copy `source` into `sink` until EOF or a read error other than `Interrupted`.
fn pump<R: Read>(mut source: R, sink: &Mutex<Vec<u8>>) {
    let mut chunk = [0u8; 8192];
    loop {
        match source.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                if let Ok(mut buffer) = sink.lock() {
                    buffer.extend_from_slice(&chunk[..n]);
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
}
