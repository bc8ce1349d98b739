//! Job description
//!
//! A job names a checkout under the data directory, the arguments to pass
//! to the build tool, the variables to expose to it, and a test-type
//! selector of the form `<group>/<subtype>` (e.g. `maven/test`).

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::str::FromStr;

use crate::error::LaneError;

/// Location of a checked-out repository, relative to `<data_dir>/repo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Project directory holding the build descriptor
    pub path: String,
    /// Directory the tool runs in, when it differs from `path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

/// What the job carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Content {
    /// A single uploaded file; this lane cannot run it.
    File {
        #[serde(default)]
        data: String,
    },
    /// A checked-out source tree.
    GitDirectory { repository: Repository },
}

impl Content {
    /// The repository, if this content is a checkout.
    pub fn repository(&self) -> Option<&Repository> {
        match self {
            Content::GitDirectory { repository } => Some(repository),
            Content::File { .. } => None,
        }
    }
}

/// A resolved variable exposed to the build tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: String,
    /// Sensitive values are scrubbed from captured output
    #[serde(default, alias = "secret")]
    pub sensitive: bool,
}

impl Variable {
    pub fn plain(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sensitive: false,
        }
    }

    pub fn sensitive(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sensitive: true,
        }
    }
}

/// Job variables, unique by name.
///
/// Serialized as a list; a list with a repeated name is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Variable>", into = "Vec<Variable>")]
pub struct Variables(BTreeMap<String, Variable>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a variable by name.
    pub fn insert(&mut self, variable: Variable) -> Option<Variable> {
        self.0.insert(variable.name.clone(), variable)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.0.get(name)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, Variable> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values of sensitive variables.
    pub fn sensitive_values(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|v| v.sensitive).map(|v| v.value.as_str())
    }
}

impl TryFrom<Vec<Variable>> for Variables {
    type Error = String;

    fn try_from(list: Vec<Variable>) -> Result<Self, Self::Error> {
        let mut variables = Variables::new();
        for variable in list {
            let name = variable.name.clone();
            if variables.insert(variable).is_some() {
                return Err(format!("duplicate variable `{}`", name));
            }
        }
        Ok(variables)
    }
}

impl From<Variables> for Vec<Variable> {
    fn from(variables: Variables) -> Self {
        variables.0.into_values().collect()
    }
}

impl FromIterator<Variable> for Variables {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        let mut variables = Variables::new();
        for variable in iter {
            variables.insert(variable);
        }
        variables
    }
}

impl<'a> IntoIterator for &'a Variables {
    type Item = &'a Variable;
    type IntoIter = btree_map::Values<'a, String, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Execution identifier assigned by the scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: Content,
    /// Arguments passed to the tool verbatim, in order
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub variables: Variables,
    /// Settings payload written to the workspace before the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables_file: Option<String>,
    /// Selector of the form `<group>/<subtype>`
    pub test_type: String,
}

impl Job {
    /// A checkout job with no args, variables or settings.
    pub fn git_directory(path: impl Into<String>, test_type: impl Into<String>) -> Self {
        Self {
            id: None,
            content: Content::GitDirectory {
                repository: Repository {
                    path: path.into(),
                    working_dir: None,
                },
            },
            args: Vec::new(),
            variables: Variables::new(),
            variables_file: None,
            test_type: test_type.into(),
        }
    }

    /// The settings payload, when one was supplied and is non-empty.
    pub fn settings_payload(&self) -> Option<&str> {
        self.variables_file.as_deref().filter(|p| !p.is_empty())
    }

    /// Parse the test-type selector.
    pub fn test_type(&self) -> Result<TestType, LaneError> {
        self.test_type.parse()
    }
}

/// Parsed `<group>/<subtype>` selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestType {
    pub group: String,
    pub subtype: String,
}

/// Subtype meaning "the job args already describe the whole invocation".
const PROJECT_SUBTYPE: &str = "project";

impl TestType {
    /// Goal or phase to append, if any.
    pub fn goal(&self) -> Option<&str> {
        if self.subtype.eq_ignore_ascii_case(PROJECT_SUBTYPE) {
            None
        } else {
            Some(&self.subtype)
        }
    }
}

impl FromStr for TestType {
    type Err = LaneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split('/');
        let group = segments.next().unwrap_or_default();
        match segments.next() {
            Some(subtype) if !subtype.is_empty() => Ok(TestType {
                group: group.to_string(),
                subtype: subtype.to_string(),
            }),
            _ => Err(LaneError::InvalidTestType(s.to_string())),
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.subtype)
    }
}
