//! Read-only bind mounts for environment directories.

use std::path::Path;

use chos_common::error::{ChosError, Result};

/// Bind-mounts `source` onto `dest`, requesting read-only, nodev, and nosuid.
///
/// The flags ride along with `MS_BIND` in a single call. The kernel ignores
/// them for a fresh bind mount, so the result may still be writable and
/// allow device nodes or setuid binaries. Do not treat this as a security
/// boundary; the trust boundary is the root-owned configuration.
///
/// # Errors
///
/// Returns [`ChosError::Mount`] if the `mount(2)` syscall fails.
#[cfg(target_os = "linux")]
pub fn bind_mount_readonly(source: &Path, dest: &Path) -> Result<()> {
    use nix::mount::{MsFlags, mount};

    // TODO: follow up with MS_REMOUNT|MS_BIND|MS_RDONLY once sites confirm no
    // environment relies on writable binds.
    let flags = MsFlags::MS_BIND | MsFlags::MS_NODEV | MsFlags::MS_NOSUID | MsFlags::MS_RDONLY;
    mount(Some(source), dest, None::<&str>, flags, None::<&str>).map_err(|e| {
        ChosError::Mount {
            source_path: source.to_path_buf(),
            dest: dest.to_path_buf(),
            source: e.into(),
        }
    })?;
    tracing::debug!(source = %source.display(), dest = %dest.display(), "bind mount completed");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — bind mounts require Linux.
#[cfg(not(target_os = "linux"))]
pub fn bind_mount_readonly(_source: &Path, _dest: &Path) -> Result<()> {
    Err(ChosError::Config {
        message: "Linux required for bind mounts".into(),
    })
}

/// Unmounts whatever is mounted at `dest`.
///
/// # Errors
///
/// Returns [`ChosError::Unmount`] if the `umount(2)` syscall fails, e.g.
/// with `EBUSY` while a nested bind is still mounted.
#[cfg(target_os = "linux")]
pub fn unmount(dest: &Path) -> Result<()> {
    nix::mount::umount(dest).map_err(|e| ChosError::Unmount {
        dest: dest.to_path_buf(),
        source: e.into(),
    })?;
    tracing::debug!(dest = %dest.display(), "unmounted");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — unmounting requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn unmount(_dest: &Path) -> Result<()> {
    Err(ChosError::Config {
        message: "Linux required for unmounting".into(),
    })
}
