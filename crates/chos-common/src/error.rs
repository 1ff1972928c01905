//! Unified error types for the chos workspace.
//!
//! Every variant names the path, environment, or configuration line that
//! caused it so the message can be shown to the user as-is. None of these
//! errors are retried by callers.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ChosError {
    /// A configuration file does not exist or cannot be opened.
    #[error("error opening config file {path}: {source}")]
    ConfigNotFound {
        /// Path of the missing file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration file is not owned by the trusted identity.
    #[error("{path} must be owned by uid {expected} (owned by uid {owner})")]
    PermissionDenied {
        /// Path of the rejected file.
        path: PathBuf,
        /// Uid that actually owns the file.
        owner: u32,
        /// Uid required by the trust contract.
        expected: u32,
    },

    /// A line of an environment file is not a `SOURCE DEST` pair.
    #[error("invalid line {line_no} in chos config file {path}: {line:?}")]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// One-based line number.
        line_no: usize,
        /// The offending line, without its newline.
        line: String,
    },

    /// No environment with the requested name is registered.
    #[error("environment {name} not found")]
    EnvironmentNotFound {
        /// Requested environment name.
        name: String,
    },

    /// `unshare(CLONE_NEWNS)` failed, usually for lack of privilege.
    #[error("failed to create mount namespace: {source}")]
    Namespace {
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A `chdir` or `pivot_root` step of the root switch failed.
    #[error("{op} {path}: {source}")]
    Pivot {
        /// Which call failed (`chdir` or `pivot_root`).
        op: &'static str,
        /// Path the call was applied to.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A read-only bind mount could not be applied.
    #[error("mount {source_path} on {dest}: {source}")]
    Mount {
        /// Host directory being bound.
        source_path: PathBuf,
        /// Mount point inside the new root.
        dest: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A bind from the previous environment could not be unmounted.
    #[error("umount {dest}: {source}")]
    Unmount {
        /// Mount point that stayed busy or missing.
        dest: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// An I/O operation outside the switch sequence failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A layout file could not be deserialized.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ChosError>;
