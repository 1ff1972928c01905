//! `%SHELL` alias lookup.
//!
//! Lines have the form `alias:path`. The login wrapper uses the path to
//! pick a shell environment before it asks for a switch.

use std::path::{Path, PathBuf};

use chos_common::constants::SHELL_SECTION;
use chos_common::error::Result;

use super::read_section;

/// Finds the path for `name` in the `%SHELL` section of `site_config`.
///
/// Lines without a `:` are ignored. Returns `None` if no alias matches.
///
/// # Errors
///
/// Returns an error if the site file is missing, not owned by
/// `trusted_uid`, or unreadable.
pub fn resolve_alias(site_config: &Path, trusted_uid: u32, name: &str) -> Result<Option<PathBuf>> {
    let found = read_section(site_config, trusted_uid, SHELL_SECTION)?
        .iter()
        .filter_map(|line| line.split_once(':'))
        .find(|(alias, _)| *alias == name)
        .map(|(_, path)| PathBuf::from(path));

    tracing::debug!(alias = name, found = found.is_some(), "resolved alias");
    Ok(found)
}
