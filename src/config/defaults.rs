//! Built-in defaults (layer 1)
//!
//! The lane ships configured for Maven with Surefire reports.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Data directory used when neither a config file nor `RUNNER_DATADIR` sets one.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// How to drive one build tool and where it leaves its reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildTool {
    /// Display name used in logs
    pub name: String,
    /// Project descriptor that must exist in the checkout (e.g. `pom.xml`)
    pub descriptor: String,
    /// Project-local wrapper script, preferred when present
    pub wrapper: String,
    /// Command used when the project has no wrapper
    pub system_command: String,
    /// Flag that points the tool at a settings file
    pub settings_flag: String,
    /// File name the settings payload is written to
    pub settings_file: String,
    /// Report directory, relative to the project directory
    pub report_dir: PathBuf,
    /// Exit codes meaning "the tool ran but tests failed"
    pub graceful_exit_codes: Vec<i32>,
    /// Variables removed from the child environment
    pub unset_env: Vec<String>,
    /// Replacement for sensitive values in captured output
    pub redaction_placeholder: String,
}

impl BuildTool {
    /// Maven with the Surefire plugin.
    pub fn maven() -> Self {
        Self {
            name: "maven".to_string(),
            descriptor: "pom.xml".to_string(),
            wrapper: "mvnw".to_string(),
            system_command: "mvn".to_string(),
            settings_flag: "--settings".to_string(),
            settings_file: "settings.xml".to_string(),
            report_dir: PathBuf::from("target").join("surefire-reports"),
            graceful_exit_codes: vec![1],
            // workaround for https://github.com/eclipse/che/issues/13926
            unset_env: vec!["MAVEN_CONFIG".to_string()],
            redaction_placeholder: "********".to_string(),
        }
    }
}

impl Default for BuildTool {
    fn default() -> Self {
        Self::maven()
    }
}

/// Lane configuration after all layers have been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Base data directory; checkouts live under `<data_dir>/repo`
    pub data_dir: PathBuf,
    /// Value passed as `-Duser.home=` to the tool, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_home_override: Option<String>,
    /// Build tool profile
    pub tool: BuildTool,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            user_home_override: None,
            tool: BuildTool::maven(),
        }
    }
}

impl LaneConfig {
    /// Convenience constructor for a Maven lane rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maven_defaults() {
        let tool = BuildTool::default();
        assert_eq!(tool.descriptor, "pom.xml");
        assert_eq!(tool.wrapper, "mvnw");
        assert_eq!(tool.system_command, "mvn");
        assert_eq!(tool.settings_flag, "--settings");
        assert_eq!(tool.settings_file, "settings.xml");
        assert_eq!(tool.report_dir, PathBuf::from("target/surefire-reports"));
        assert_eq!(tool.graceful_exit_codes, vec![1]);
        assert_eq!(tool.unset_env, vec!["MAVEN_CONFIG".to_string()]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LaneConfig = toml::from_str(
            r#"
            data_dir = "/srv/lane"

            [tool]
            graceful_exit_codes = [1, 2]
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/lane"));
        assert_eq!(config.tool.graceful_exit_codes, vec![1, 2]);
        assert_eq!(config.tool.descriptor, "pom.xml");
        assert_eq!(config.user_home_override, None);
    }
}
