//! Ownership check for configuration files.
//!
//! A configuration file decides what gets bind-mounted over system
//! directories, so only files owned by the trusted uid are read. The check
//! runs on the open descriptor, not on the path.

use std::fs::File;
use std::io::ErrorKind;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use chos_common::error::{ChosError, Result};

/// Opens `path` for reading and verifies it is owned by `trusted_uid`.
///
/// # Errors
///
/// Returns [`ChosError::ConfigNotFound`] if the file does not exist,
/// [`ChosError::Io`] if it cannot be opened or inspected for any other
/// reason, and
/// [`ChosError::PermissionDenied`] if another uid owns it.
pub fn open_trusted(path: &Path, trusted_uid: u32) -> Result<File> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ChosError::ConfigNotFound {
            path: path.to_path_buf(),
            source: e,
        },
        _ => ChosError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let meta = file.metadata().map_err(|e| ChosError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if meta.uid() != trusted_uid {
        tracing::error!(
            path = %path.display(),
            owner = meta.uid(),
            expected = trusted_uid,
            "refusing config file with untrusted owner"
        );
        return Err(ChosError::PermissionDenied {
            path: path.to_path_buf(),
            owner: meta.uid(),
            expected: trusted_uid,
        });
    }
    Ok(file)
}
