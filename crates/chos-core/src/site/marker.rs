//! Per-user marker naming the environment a session should use.

use std::io::ErrorKind;
use std::path::Path;

use chos_common::error::{ChosError, Result};

/// Reads the environment name from `home/file_name`.
///
/// Only the first line counts. A missing file or an empty first line
/// yields `default`. Bytes that are not UTF-8 are replaced, so a garbled
/// marker names an environment that the registry lookup then rejects.
///
/// # Errors
///
/// Returns [`ChosError::Io`] if the file exists but cannot be read.
pub fn read_marker(home: &Path, file_name: &str, default: &str) -> Result<String> {
    let path = home.join(file_name);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(ChosError::Io { path, source: e }),
    };

    let text = String::from_utf8_lossy(&bytes);
    let name = text.lines().next().unwrap_or_default();
    if name.is_empty() {
        tracing::debug!(path = %path.display(), default, "no marker, using default environment");
        return Ok(default.to_owned());
    }
    Ok(name.to_owned())
}
