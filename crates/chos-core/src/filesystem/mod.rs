//! Filesystem operations used by the switch sequence.
//!
//! Thin safe wrappers around `mount(2)`, `umount(2)`, `chdir(2)`, and
//! `pivot_root(2)` that attach the failing path to every error.

pub mod mount;
pub mod pivot_root;
