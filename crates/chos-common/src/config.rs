//! Deployment configuration for chos.
//!
//! Every path the switch sequence touches comes from here rather than from
//! literals in the orchestrator. Defaults match a stock installation; a
//! root-owned JSON file may override any subset of them.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{ChosError, Result};

/// Root configuration for chos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChosConfig {
    /// Directory with one file per environment.
    pub config_dir: PathBuf,
    /// Site configuration file with `%SHELL` and `%ENV` sections.
    pub site_config: PathBuf,
    /// Marker file name, relative to the user's home directory.
    pub marker_file: String,
    /// Uid that must own every configuration file.
    pub trusted_uid: u32,
    /// Environment used when the marker file names none.
    pub default_env: String,
    /// `PATH` value exported into the switched session.
    pub default_path: String,
    /// Mount points used by the switch sequence.
    pub layout: MountLayout,
}

impl Default for ChosConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(constants::DEFAULT_CONFIG_DIR),
            site_config: PathBuf::from(constants::DEFAULT_SITE_CONFIG),
            marker_file: constants::MARKER_FILE.into(),
            trusted_uid: constants::TRUSTED_UID,
            default_env: constants::DEFAULT_ENV.into(),
            default_path: constants::DEFAULT_PATH.into(),
            layout: MountLayout::default(),
        }
    }
}

impl ChosConfig {
    /// Loads a configuration from a JSON file, filling unset fields with defaults.
    ///
    /// The file must be owned by `trusted_uid`, like every other file that
    /// can redirect mount sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, untrusted, or malformed.
    pub fn load(path: &Path, trusted_uid: u32) -> Result<Self> {
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
            return Err(ChosError::PermissionDenied {
                path: path.to_path_buf(),
                owner: meta.uid(),
                expected: trusted_uid,
            });
        }
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.layout.validate()?;
        Ok(config)
    }
}

/// The four mount points of the double-pivot switch.
///
/// With the defaults, an environment's binds live under `/chos2` and the
/// base system stays reachable at `/chos2/local` once the switch completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountLayout {
    /// Mount point of the unmodified base system.
    pub base_root: PathBuf,
    /// Old-root location used when pivoting back to the base system.
    pub base_put_old: PathBuf,
    /// Staging root that environment binds are mounted into.
    pub new_root: PathBuf,
    /// Back-reference to the base system after the final pivot.
    /// Binds with this destination are never unmounted automatically.
    pub new_put_old: PathBuf,
}

impl Default for MountLayout {
    fn default() -> Self {
        Self {
            base_root: PathBuf::from(constants::BASE_ROOT),
            base_put_old: PathBuf::from(constants::BASE_PUT_OLD),
            new_root: PathBuf::from(constants::NEW_ROOT),
            new_put_old: PathBuf::from(constants::NEW_PUT_OLD),
        }
    }
}

impl MountLayout {
    /// Checks that each `put_old` lies beneath its root, as `pivot_root(2)` requires.
    ///
    /// # Errors
    ///
    /// Returns [`ChosError::Config`] naming the offending pair.
    pub fn validate(&self) -> Result<()> {
        for (root, put_old) in [
            (&self.base_root, &self.base_put_old),
            (&self.new_root, &self.new_put_old),
        ] {
            if !root.is_absolute() || !put_old.starts_with(root) || put_old == root {
                return Err(ChosError::Config {
                    message: format!(
                        "{} must be an absolute path strictly beneath {}",
                        put_old.display(),
                        root.display()
                    ),
                });
            }
        }
        Ok(())
    }
}
