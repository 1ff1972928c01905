//! Mount namespace isolation.
//!
//! Gives the calling process its own copy of the mount table so binds and
//! pivots never leak into other sessions on the node.

use chos_common::error::{ChosError, Result};

/// Moves the calling process into a new mount namespace.
///
/// # Errors
///
/// Returns [`ChosError::Namespace`] if `unshare(CLONE_NEWNS)` fails,
/// typically because the caller lacks `CAP_SYS_ADMIN`.
#[cfg(target_os = "linux")]
pub fn create_mount_namespace() -> Result<()> {
    use nix::sched::{CloneFlags, unshare};

    unshare(CloneFlags::CLONE_NEWNS).map_err(|e| ChosError::Namespace { source: e.into() })?;
    tracing::debug!("mount namespace created");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — mount namespaces require Linux.
#[cfg(not(target_os = "linux"))]
pub fn create_mount_namespace() -> Result<()> {
    Err(ChosError::Config {
        message: "Linux required for mount namespaces".into(),
    })
}
