//! Mock process runner
//!
//! Records every invocation and answers with scripted output instead of
//! spawning anything. Used by unit and integration tests to drive the lane
//! through each exit classification without a build tool installed.

use std::sync::{Arc, Mutex};

use crate::process::{ExitKind, Invocation, ProcessOutput, ProcessRunner};

type Hook = Arc<dyn Fn(&Invocation) + Send + Sync>;

/// A [`ProcessRunner`] that never spawns.
#[derive(Clone)]
pub struct MockRunner {
    output: Vec<u8>,
    exit: ExitKind,
    calls: Arc<Mutex<Vec<Invocation>>>,
    on_run: Option<Hook>,
}

impl std::fmt::Debug for MockRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRunner")
            .field("exit", &self.exit)
            .field("calls", &self.call_count())
            .finish()
    }
}

impl MockRunner {
    /// Answer every invocation with `output` and `exit`.
    pub fn new(output: impl Into<Vec<u8>>, exit: ExitKind) -> Self {
        Self {
            output: output.into(),
            exit,
            calls: Arc::new(Mutex::new(Vec::new())),
            on_run: None,
        }
    }

    /// Zero exit.
    pub fn succeeding(output: impl Into<Vec<u8>>) -> Self {
        Self::new(output, ExitKind::Code(0))
    }

    /// Exit with `code`.
    pub fn exiting(code: i32, output: impl Into<Vec<u8>>) -> Self {
        Self::new(output, ExitKind::Code(code))
    }

    /// Tool not found.
    pub fn missing_tool(program: &str) -> Self {
        Self::new(
            Vec::new(),
            ExitKind::SpawnFailed(format!(
                "failed to start {}: No such file or directory (os error 2)",
                program
            )),
        )
    }

    /// Run `hook` on each invocation, e.g. to drop report files in place.
    pub fn with_hook(mut self, hook: impl Fn(&Invocation) + Send + Sync + 'static) -> Self {
        self.on_run = Some(Arc::new(hook));
        self
    }

    /// Invocations received so far.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> ProcessOutput {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }
        if let Some(hook) = &self.on_run {
            hook(invocation);
        }
        ProcessOutput {
            output: self.output.clone(),
            exit: self.exit.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvOverlay;
    use std::path::PathBuf;

    fn invocation() -> Invocation {
        Invocation {
            program: "mvn".to_string(),
            args: vec!["test".to_string()],
            cwd: PathBuf::from("/data/repo/app"),
            env: EnvOverlay::new(),
        }
    }

    #[test]
    fn test_records_calls() {
        let runner = MockRunner::succeeding("ok");
        assert_eq!(runner.call_count(), 0);

        let output = runner.run(&invocation());
        assert_eq!(output.output, b"ok".to_vec());
        assert_eq!(output.exit, ExitKind::Code(0));
        assert_eq!(runner.calls(), vec![invocation()]);
    }

    #[test]
    fn test_clones_share_calls() {
        let runner = MockRunner::exiting(1, "");
        let observer = runner.clone();
        runner.run(&invocation());
        assert_eq!(observer.call_count(), 1);
    }

    #[test]
    fn test_hook_runs() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let runner = MockRunner::succeeding("").with_hook(move |inv| {
            *sink.lock().unwrap() = Some(inv.program.clone());
        });

        runner.run(&invocation());
        assert_eq!(seen.lock().unwrap().as_deref(), Some("mvn"));
    }
}
