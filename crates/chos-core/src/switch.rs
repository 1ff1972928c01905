//! The environment switch sequence.
//!
//! A switch moves the calling process through up to two root pivots:
//!
//! ```text
//! environment root ──(1)──▶ base root ──(2)──▶ target environment root
//!   /chos2 as /                /local as /          /chos2 as /
//! ```
//!
//! Pivot (1) only happens when `CURRENT` lists binds to unwind; pivot (2)
//! always happens. Every step mutates the mount table of a freshly
//! unshared namespace and none of them is undone on failure: the caller is
//! expected to exit rather than keep running on a half-switched root.

use std::path::Path;

use chos_common::config::MountLayout;
use chos_common::error::Result;

use crate::environment::{DirectoryBindSet, Environment};
use crate::filesystem::{mount, pivot_root};
use crate::namespace;
use crate::registry::EnvironmentRegistry;

/// Kernel operations issued by a switch.
///
/// [`KernelMounts`] is the real implementation; tests drive the
/// orchestrator with a recorder instead.
pub trait MountOps {
    /// Moves the process into a private mount namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ChosError::Namespace`](chos_common::error::ChosError::Namespace) on failure.
    fn unshare_mount_namespace(&mut self) -> Result<()>;

    /// Changes the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ChosError::Pivot`](chos_common::error::ChosError::Pivot) on failure.
    fn change_dir(&mut self, path: &Path) -> Result<()>;

    /// Swaps the root for `new_root`, parking the old root at `put_old`.
    ///
    /// # Errors
    ///
    /// Returns [`ChosError::Pivot`](chos_common::error::ChosError::Pivot) on failure.
    fn pivot_root(&mut self, new_root: &Path, put_old: &Path) -> Result<()>;

    /// Bind-mounts `source` onto `dest` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`ChosError::Mount`](chos_common::error::ChosError::Mount) on failure.
    fn bind_mount_readonly(&mut self, source: &Path, dest: &Path) -> Result<()>;

    /// Unmounts `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`ChosError::Unmount`](chos_common::error::ChosError::Unmount) on failure.
    fn unmount(&mut self, dest: &Path) -> Result<()>;
}

/// [`MountOps`] backed by real system calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct KernelMounts;

impl MountOps for KernelMounts {
    fn unshare_mount_namespace(&mut self) -> Result<()> {
        namespace::mount::create_mount_namespace()
    }

    fn change_dir(&mut self, path: &Path) -> Result<()> {
        pivot_root::change_dir(path)
    }

    fn pivot_root(&mut self, new_root: &Path, put_old: &Path) -> Result<()> {
        pivot_root::pivot_root(new_root, put_old)
    }

    fn bind_mount_readonly(&mut self, source: &Path, dest: &Path) -> Result<()> {
        mount::bind_mount_readonly(source, dest)
    }

    fn unmount(&mut self, dest: &Path) -> Result<()> {
        mount::unmount(dest)
    }
}

/// Drives one switch against a loaded registry.
///
/// Holding a registry is what separates a configured process from an
/// unconfigured one; whether the process currently sits in an environment
/// root is re-derived from configuration on every call.
#[derive(Debug)]
pub struct MountOrchestrator<'a, O: MountOps> {
    registry: &'a EnvironmentRegistry,
    layout: &'a MountLayout,
    ops: O,
}

impl<'a, O: MountOps> MountOrchestrator<'a, O> {
    /// Creates an orchestrator over `registry` using the paths in `layout`.
    pub const fn new(registry: &'a EnvironmentRegistry, layout: &'a MountLayout, ops: O) -> Self {
        Self {
            registry,
            layout,
            ops,
        }
    }

    /// Consumes the orchestrator, returning its [`MountOps`].
    pub fn into_ops(self) -> O {
        self.ops
    }

    /// Returns `true` when `CURRENT` lists no binds.
    ///
    /// This reads configuration only and never inspects the mount table. A
    /// `false` result means the switch must first pivot back to the base
    /// root and unmount `CURRENT`'s binds. A missing `CURRENT` file counts
    /// as an empty bind set.
    pub fn is_chrooted(&self) -> bool {
        self.current_binds().is_none_or(DirectoryBindSet::is_empty)
    }

    /// Switches the process root to the environment called `name`.
    ///
    /// Returns the environment now in effect.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentNotFound`](chos_common::error::ChosError::EnvironmentNotFound)
    /// before touching the kernel if `name` is unknown, and otherwise the
    /// first `Namespace`, `Pivot`, `Unmount`, or `Mount` error. Steps
    /// already taken stay in effect.
    pub fn switch_to(&mut self, name: &str) -> Result<&'a Environment> {
        let registry = self.registry;
        let env = registry.lookup(name).inspect_err(|e| {
            tracing::error!(env = name, error = %e, "environment not found");
        })?;

        self.ops.unshare_mount_namespace().inspect_err(|e| {
            tracing::error!(env = name, error = %e, "unshare failed");
        })?;
        tracing::info!(env = name, "mount namespace isolated");

        if !self.is_chrooted() {
            self.enter_base_root()?;
            self.unmount_current()?;
        }

        if !env.binds().is_empty() {
            self.mount_binds(env)?;
        }

        self.pivot_into_new_root()?;
        tracing::info!(
            env = env.name(),
            new_root = %self.layout.new_root.display(),
            "chroot complete"
        );
        Ok(env)
    }

    fn current_binds(&self) -> Option<&'a DirectoryBindSet> {
        let registry: &'a EnvironmentRegistry = self.registry;
        registry.current().map(Environment::binds)
    }

    fn enter_base_root(&mut self) -> Result<()> {
        let layout = self.layout;
        self.change_dir(&layout.base_root)?;
        self.pivot_root(&layout.base_root, &layout.base_put_old)?;
        self.change_dir(Path::new("/"))?;
        tracing::debug!(base_root = %layout.base_root.display(), "returned to base root");
        Ok(())
    }

    fn unmount_current(&mut self) -> Result<()> {
        let Some(binds) = self.current_binds() else {
            return Ok(());
        };
        for bind in binds.teardown_order() {
            if bind.dest.starts_with(&self.layout.new_put_old) {
                tracing::debug!(dest = %bind.dest.display(), "skipping old-root alias");
                continue;
            }
            self.ops.unmount(&bind.dest).inspect_err(|e| {
                tracing::error!(dest = %bind.dest.display(), error = %e, "umount failed");
            })?;
            tracing::debug!(dest = %bind.dest.display(), "unmounted");
        }
        Ok(())
    }

    fn mount_binds(&mut self, env: &Environment) -> Result<()> {
        tracing::debug!(env = env.name(), count = env.binds().len(), "mounting binds");
        for bind in env.binds() {
            self.ops
                .bind_mount_readonly(&bind.source, &bind.dest)
                .inspect_err(|e| {
                    tracing::error!(
                        source = %bind.source.display(),
                        dest = %bind.dest.display(),
                        error = %e,
                        "mount failed"
                    );
                })?;
        }
        Ok(())
    }

    fn pivot_into_new_root(&mut self) -> Result<()> {
        let layout = self.layout;
        self.change_dir(&layout.new_root)?;
        self.pivot_root(&layout.new_root, &layout.new_put_old)
    }

    fn change_dir(&mut self, path: &Path) -> Result<()> {
        self.ops.change_dir(path).inspect_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "chdir failed");
        })
    }

    fn pivot_root(&mut self, new_root: &Path, put_old: &Path) -> Result<()> {
        self.ops.pivot_root(new_root, put_old).inspect_err(|e| {
            tracing::error!(
                new_root = %new_root.display(),
                put_old = %put_old.display(),
                error = %e,
                "pivot_root failed"
            );
        })
    }
}
