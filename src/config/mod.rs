//! Lane configuration
//!
//! Configuration is assembled from four layers, later layers winning:
//! 1. Built-in Maven defaults
//! 2. An optional TOML file
//! 3. Process environment (`RUNNER_DATADIR`, `USER`)
//! 4. CLI overrides
//!
//! Every contributing layer is recorded with its origin so the effective
//! configuration can be explained.

mod defaults;
mod layers;

pub use defaults::{BuildTool, LaneConfig, DEFAULT_DATA_DIR};
pub use layers::{deep_merge, merge_layers, toml_to_json};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the base data directory.
pub const DATA_DIR_ENV: &str = "RUNNER_DATADIR";

/// Container user whose home must be passed explicitly to the tool.
const CONTAINER_USER: &str = "maven";
const CONTAINER_USER_HOME: &str = "/home/maven";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where a configuration layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Env,
    Cli,
}

/// A contributing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// SHA-256 of the raw file bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl ConfigSource {
    fn bare(origin: ConfigOrigin) -> Self {
        Self {
            origin,
            path: None,
            digest: None,
        }
    }
}

/// The merged configuration plus the layers that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub config: LaneConfig,
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Load from the real process environment.
    pub fn load(file: Option<&Path>, cli: Option<Value>) -> Result<Self, ConfigError> {
        Self::load_with_env(file, cli, |key| std::env::var(key).ok())
    }

    /// Load with an injectable environment lookup.
    pub fn load_with_env(
        file: Option<&Path>,
        cli: Option<Value>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        let builtin = serde_json::to_value(LaneConfig::default())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        layers.push(builtin);
        sources.push(ConfigSource::bare(ConfigOrigin::Builtin));

        if let Some(path) = file {
            let (value, digest) = load_toml_file(path)?;
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.to_path_buf()),
                digest: Some(digest),
            });
        }

        let env_layer = env_layer(&env);
        if !env_layer.is_empty() {
            layers.push(Value::Object(env_layer));
            sources.push(ConfigSource::bare(ConfigOrigin::Env));
        }

        if let Some(cli) = cli.filter(|v| v.as_object().is_some_and(|m| !m.is_empty())) {
            layers.push(cli);
            sources.push(ConfigSource::bare(ConfigOrigin::Cli));
        }

        let merged = merge_layers(layers);
        let config: LaneConfig =
            serde_json::from_value(merged).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        validate(&config)?;

        Ok(Self { config, sources })
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn env_layer(env: &impl Fn(&str) -> Option<String>) -> Map<String, Value> {
    let mut layer = Map::new();

    if let Some(dir) = env(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        layer.insert("data_dir".to_string(), Value::String(dir));
    }
    if env("USER").as_deref() == Some(CONTAINER_USER) {
        layer.insert(
            "user_home_override".to_string(),
            Value::String(CONTAINER_USER_HOME.to_string()),
        );
    }

    layer
}

fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let digest = hex::encode(Sha256::digest(&bytes));

    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let contents = String::from_utf8(bytes).map_err(|e| parse_error(e.to_string()))?;
    let value: toml::Value = toml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?;

    Ok((toml_to_json(value), digest))
}

fn validate(config: &LaneConfig) -> Result<(), ConfigError> {
    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("data_dir must not be empty".to_string()));
    }

    let tool = &config.tool;
    let required = [
        ("tool.descriptor", &tool.descriptor),
        ("tool.wrapper", &tool.wrapper),
        ("tool.system_command", &tool.system_command),
        ("tool.settings_flag", &tool.settings_flag),
        ("tool.settings_file", &tool.settings_file),
        ("tool.redaction_placeholder", &tool.redaction_placeholder),
    ];
    for (key, value) in required {
        if value.is_empty() {
            return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_builtin_only() {
        let effective = EffectiveConfig::load_with_env(None, None, no_env).unwrap();
        assert_eq!(effective.config, LaneConfig::default());
        assert_eq!(effective.sources.len(), 1);
        assert_eq!(effective.sources[0].origin, ConfigOrigin::Builtin);
    }

    #[test]
    fn test_file_layer_records_digest() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_dir = \"/srv/lane\"").unwrap();

        let effective = EffectiveConfig::load_with_env(Some(file.path()), None, no_env).unwrap();
        assert_eq!(effective.config.data_dir, PathBuf::from("/srv/lane"));

        let source = &effective.sources[1];
        assert_eq!(source.origin, ConfigOrigin::File);
        assert_eq!(source.digest.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_dir = \"/srv/lane\"").unwrap();

        let env = |key: &str| match key {
            DATA_DIR_ENV => Some("/tmp/runner".to_string()),
            _ => None,
        };
        let effective = EffectiveConfig::load_with_env(Some(file.path()), None, env).unwrap();
        assert_eq!(effective.config.data_dir, PathBuf::from("/tmp/runner"));
        assert_eq!(effective.sources.last().unwrap().origin, ConfigOrigin::Env);
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = |key: &str| (key == DATA_DIR_ENV).then(|| "/tmp/runner".to_string());
        let effective = EffectiveConfig::load_with_env(
            None,
            Some(json!({"data_dir": "/from/cli"})),
            env,
        )
        .unwrap();
        assert_eq!(effective.config.data_dir, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_container_user_sets_home_override() {
        let env = |key: &str| (key == "USER").then(|| "maven".to_string());
        let effective = EffectiveConfig::load_with_env(None, None, env).unwrap();
        assert_eq!(
            effective.config.user_home_override.as_deref(),
            Some("/home/maven")
        );

        let env = |key: &str| (key == "USER").then(|| "builder".to_string());
        let effective = EffectiveConfig::load_with_env(None, None, env).unwrap();
        assert_eq!(effective.config.user_home_override, None);
    }

    #[test]
    fn test_empty_cli_layer_is_ignored() {
        let effective = EffectiveConfig::load_with_env(None, Some(json!({})), no_env).unwrap();
        assert_eq!(effective.sources.len(), 1);
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_dir = ").unwrap();

        let err = EffectiveConfig::load_with_env(Some(file.path()), None, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = EffectiveConfig::load_with_env(
            Some(Path::new("/nonexistent/lane.toml")),
            None,
            no_env,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_empty_wrapper_rejected() {
        let err = EffectiveConfig::load_with_env(
            None,
            Some(json!({"tool": {"wrapper": ""}})),
            no_env,
        )
        .unwrap_err();
        assert!(err.to_string().contains("tool.wrapper"));
    }
}
