//! Settings file materialization.

use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{self, Path, PathBuf};

use crate::config::BuildTool;
use crate::error::{LaneError, LaneResult};

/// A settings file written into the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFile {
    pub path: PathBuf,
    /// SHA-256 of the payload, for the run log
    pub sha256: String,
}

/// Write `payload` verbatim to `<directory>/<tool.settings_file>`.
///
/// The returned path is absolute: the tool runs from its own working
/// directory and must find the file regardless of how `directory` was
/// spelled. An existing file is replaced. Writes are not locked.
pub fn write_settings(tool: &BuildTool, directory: &Path, payload: &str) -> LaneResult<SettingsFile> {
    let write_failed = |source: io::Error| LaneError::SettingsWriteFailed {
        file: tool.settings_file.clone(),
        source,
    };

    let path = path::absolute(directory.join(&tool.settings_file)).map_err(write_failed)?;
    write_file(&path, payload.as_bytes()).map_err(write_failed)?;

    Ok(SettingsFile {
        path,
        sha256: hex::encode(Sha256::digest(payload.as_bytes())),
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.flush()
}
