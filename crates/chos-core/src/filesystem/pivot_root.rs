//! Root filesystem switching via `pivot_root(2)`.
//!
//! Unlike `chroot`, this moves the root mount itself, so the old root stays
//! reachable only through `put_old`.

use std::path::Path;

use chos_common::error::{ChosError, Result};

/// Changes the working directory of the calling process.
///
/// # Errors
///
/// Returns [`ChosError::Pivot`] if `chdir(2)` fails.
pub fn change_dir(path: &Path) -> Result<()> {
    nix::unistd::chdir(path).map_err(|e| ChosError::Pivot {
        op: "chdir",
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Makes `new_root` the process root, moving the old root to `put_old`.
///
/// `put_old` must be at or beneath `new_root`.
///
/// # Errors
///
/// Returns [`ChosError::Pivot`] if `pivot_root(2)` fails.
#[cfg(target_os = "linux")]
pub fn pivot_root(new_root: &Path, put_old: &Path) -> Result<()> {
    nix::unistd::pivot_root(new_root, put_old).map_err(|e| ChosError::Pivot {
        op: "pivot_root",
        path: new_root.to_path_buf(),
        source: e.into(),
    })?;
    tracing::info!(
        new_root = %new_root.display(),
        put_old = %put_old.display(),
        "pivot_root completed"
    );
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — `pivot_root` requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn pivot_root(_new_root: &Path, _put_old: &Path) -> Result<()> {
    Err(ChosError::Config {
        message: "Linux required for pivot_root".into(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn change_dir_to_missing_path_names_it() {
        let err = change_dir(Path::new("/nonexistent/chos2")).unwrap_err();
        assert!(matches!(err, ChosError::Pivot { op: "chdir", .. }));
        assert!(err.to_string().contains("/nonexistent/chos2"));
    }
}
