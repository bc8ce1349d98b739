//! Run state machine
//!
//! `NotStarted → WorkspaceChecked → ContentValidated → ProjectFileValidated →
//! CommandResolved → (SettingsWritten)? → Executed → (ReportsCollected)? →
//! Assembled`
//!
//! Any non-terminal state may jump straight to `Assembled`: that is how the
//! early exits (unsupported content, missing descriptor, settings failure,
//! execution failure) end a run.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LaneError, LaneResult};

/// Progress of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    NotStarted,
    WorkspaceChecked,
    ContentValidated,
    ProjectFileValidated,
    CommandResolved,
    SettingsWritten,
    Executed,
    ReportsCollected,
    Assembled,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Assembled)
    }

    /// Check if transition from this state to target is valid
    pub fn can_transition_to(&self, target: RunState) -> bool {
        use RunState::*;

        match (self, target) {
            (Assembled, _) => false,
            (_, Assembled) => true,

            (NotStarted, WorkspaceChecked) => true,
            (WorkspaceChecked, ContentValidated) => true,
            (ContentValidated, ProjectFileValidated) => true,
            (ProjectFileValidated, CommandResolved) => true,

            // settings are optional
            (CommandResolved, SettingsWritten) => true,
            (CommandResolved, Executed) => true,
            (SettingsWritten, Executed) => true,

            (Executed, ReportsCollected) => true,

            _ => false,
        }
    }
}

/// Tracks the current state and the path taken through the machine.
#[derive(Debug, Clone)]
pub struct RunProgress {
    state: RunState,
    history: Vec<RunState>,
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl RunProgress {
    pub fn new() -> Self {
        Self {
            state: RunState::NotStarted,
            history: vec![RunState::NotStarted],
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// States visited so far, oldest first.
    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    /// Move to `next`, rejecting transitions the machine does not allow.
    pub fn advance(&mut self, next: RunState) -> LaneResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(LaneError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
        self.history.push(next);
        Ok(())
    }
}
