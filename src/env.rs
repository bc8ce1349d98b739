//! Child process environment
//!
//! Job variables are applied as an overlay on the spawned command rather
//! than written into this process's environment, so one run can never leak
//! variables into the next.

use std::collections::{BTreeMap, BTreeSet};
use std::process::Command;

use crate::job::Variables;

/// Variables to set and remove on top of the inherited environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    set: BTreeMap<String, String>,
    unset: BTreeSet<String>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay for a job: every variable is set, sensitive or not, and the
    /// `unset` keys are removed.
    pub fn for_job<'a>(variables: &Variables, unset: impl IntoIterator<Item = &'a String>) -> Self {
        let mut overlay = Self::new();
        for variable in variables {
            overlay.set(&variable.name, &variable.value);
        }
        for key in unset {
            overlay.remove(key);
        }
        overlay
    }

    /// Set a variable. Cancels an earlier removal of the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.unset.remove(&key);
        self.set.insert(key, value.into());
    }

    /// Remove a variable from the child environment.
    pub fn remove(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.set.remove(&key);
        self.unset.insert(key);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.set.get(key).map(String::as_str)
    }

    pub fn is_removed(&self, key: &str) -> bool {
        self.unset.contains(key)
    }

    /// Keys that will be set (values are never logged).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.set.keys().map(String::as_str)
    }

    pub fn removed_keys(&self) -> impl Iterator<Item = &str> {
        self.unset.iter().map(String::as_str)
    }

    /// Apply to a command that inherits the current environment.
    pub fn apply(&self, command: &mut Command) {
        for key in &self.unset {
            command.env_remove(key);
        }
        command.envs(&self.set);
    }
}
