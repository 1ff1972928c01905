//! Builds the environment registry from the configuration directory.
//!
//! Each regular file in the directory defines one environment named after
//! the file. Lines are `SOURCE DEST`; blank lines and lines starting with
//! `#` are ignored. Any bad line or untrusted file aborts the whole load.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use chos_common::config::ChosConfig;
use chos_common::constants::ROOT_ENV;
use chos_common::error::{ChosError, Result};

use crate::environment::{DirectoryBind, DirectoryBindSet, Environment};
use crate::registry::EnvironmentRegistry;
use crate::trust::open_trusted;

/// Loads the registry described by `config`.
///
/// # Errors
///
/// Returns the first error hit while loading; see [`ConfigLoader::load_all`].
pub fn configure(config: &ChosConfig) -> Result<EnvironmentRegistry> {
    tracing::debug!(dir = %config.config_dir.display(), "initializing chos");
    ConfigLoader::new(&config.config_dir, config.trusted_uid).load_all()
}

/// Reads environment files from one directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    trusted_uid: u32,
}

impl ConfigLoader {
    /// Creates a loader for `config_dir`, trusting files owned by `trusted_uid`.
    #[must_use]
    pub fn new(config_dir: impl Into<PathBuf>, trusted_uid: u32) -> Self {
        Self {
            config_dir: config_dir.into(),
            trusted_uid,
        }
    }

    /// Loads `root` and then every other regular file, in directory order.
    ///
    /// Symlinks, directories, and other non-regular entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is missing, the directory cannot be read,
    /// or any environment fails [`create_environment`](Self::create_environment).
    /// No partial registry is returned.
    pub fn load_all(&self) -> Result<EnvironmentRegistry> {
        let mut registry = EnvironmentRegistry::new();
        registry.append(self.create_environment(ROOT_ENV)?)?;

        let entries = std::fs::read_dir(&self.config_dir).map_err(|e| {
            tracing::error!(dir = %self.config_dir.display(), error = %e, "failed to open config directory");
            ChosError::ConfigNotFound {
                path: self.config_dir.clone(),
                source: e,
            }
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ChosError::Io {
                path: self.config_dir.clone(),
                source: e,
            })?;
            let file_type = entry.file_type().map_err(|e| ChosError::Io {
                path: entry.path(),
                source: e,
            })?;
            if !file_type.is_file() {
                tracing::debug!(path = %entry.path().display(), "skipping non-regular entry");
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                tracing::debug!(path = %entry.path().display(), "skipping non-UTF-8 file name");
                continue;
            };
            if name == ROOT_ENV {
                continue;
            }

            tracing::debug!(env = name, "reading config");
            let env = self.create_environment(name).inspect_err(|e| {
                tracing::error!(env = name, error = %e, "failed to add environment");
            })?;
            registry.append(env)?;
        }

        tracing::debug!(count = registry.len(), "done reading configs");
        Ok(registry)
    }

    /// Parses `config_dir/name` into an environment.
    ///
    /// # Errors
    ///
    /// Returns [`ChosError::ConfigNotFound`] if the file is missing,
    /// [`ChosError::PermissionDenied`] if it is not owned by the trusted uid,
    /// and [`ChosError::Parse`] for a line that is not exactly two tokens.
    pub fn create_environment(&self, name: &str) -> Result<Environment> {
        let path = self.config_dir.join(name);
        tracing::debug!(env = name, path = %path.display(), "creating environment");

        let file = open_trusted(&path, self.trusted_uid)?;
        let binds = parse_binds(&path, file)?;
        Ok(Environment::new(name, path, binds))
    }
}

/// Parses `SOURCE DEST` lines from `reader`, keeping their order.
///
/// `path` is only used for error messages.
///
/// # Errors
///
/// Returns [`ChosError::Parse`] for a line with other than two
/// whitespace-separated tokens, or [`ChosError::Io`] if reading fails.
pub fn parse_binds(path: &Path, reader: impl Read) -> Result<DirectoryBindSet> {
    let mut binds = DirectoryBindSet::new();

    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|e| ChosError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(src), Some(dest), None) => {
                tracing::debug!(src, dest, path = %path.display(), "append bind");
                binds.push(DirectoryBind::new(src, dest));
            }
            _ => {
                tracing::error!(path = %path.display(), line = %line, "invalid line in chos config file");
                return Err(ChosError::Parse {
                    path: path.to_path_buf(),
                    line_no: i + 1,
                    line,
                });
            }
        }
    }

    Ok(binds)
}
