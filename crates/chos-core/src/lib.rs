//! # chos-core
//!
//! Switches the calling process into one of several administrator-defined
//! OS environments without a reboot.
//!
//! This crate provides:
//! - **Environment model**: ordered read-only bind sets, one per environment.
//! - **Loader**: parses the root-owned configuration directory into a registry.
//! - **Switch orchestrator**: unshares the mount namespace, unwinds the active
//!   environment, mounts the target, and pivots the root.
//! - **Site configuration**: `%SHELL` alias lookup, `%ENV` pass-through, and
//!   the per-user marker file.
//!
//! Kernel calls go through the [`switch::MountOps`] trait. The production
//! implementation wraps `nix` in the `namespace` and `filesystem` modules.

pub mod environment;
pub mod filesystem;
pub mod loader;
pub mod namespace;
pub mod registry;
pub mod site;
pub mod switch;
pub mod trust;

pub use environment::{DirectoryBind, DirectoryBindSet, Environment};
pub use loader::{ConfigLoader, configure};
pub use registry::EnvironmentRegistry;
pub use switch::{KernelMounts, MountOps, MountOrchestrator};
