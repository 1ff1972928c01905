//! `%ENV` pass-through of the caller's variables.
//!
//! The switched session starts from an empty environment. Only variables
//! named in the `%ENV` section survive, and `PATH` is always replaced by
//! the site default so the caller cannot point it into the old root.

use std::path::Path;

use chos_common::error::Result;

use super::read_section;

/// Builds the `(name, value)` pairs for the switched session.
///
/// Each name in `%ENV` is looked up with `lookup`; unset names are dropped.
/// A `PATH` entry always yields `default_path`.
///
/// # Errors
///
/// Returns an error if the site file is missing, not owned by
/// `trusted_uid`, or unreadable.
pub fn materialize_env<F>(
    site_config: &Path,
    trusted_uid: u32,
    default_path: &str,
    lookup: F,
) -> Result<Vec<(String, String)>>
where
    F: Fn(&str) -> Option<String>,
{
    let vars = read_section(site_config, trusted_uid, chos_common::constants::ENV_SECTION)?
        .into_iter()
        .filter_map(|name| {
            if name == "PATH" {
                Some((name, default_path.to_owned()))
            } else {
                lookup(&name).map(|value| (name, value))
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(count = vars.len(), "materialized session environment");
    Ok(vars)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use std::os::unix::fs::MetadataExt;

    use super::*;

    #[test]
    fn keeps_listed_variables_and_forces_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chos");
        std::fs::write(&path, "%SHELL\nsl5:/os/sl5\n%ENV\nHOME\nPATH\nUNSET\nTERM\n").expect("write");
        let uid = std::fs::metadata(&path).expect("metadata").uid();

        let lookup = |name: &str| match name {
            "HOME" => Some("/home/alice".to_owned()),
            "PATH" => Some("/tmp/evil".to_owned()),
            "TERM" => Some("xterm".to_owned()),
            _ => None,
        };
        let vars = materialize_env(&path, uid, "/usr/bin:/bin", lookup).unwrap();

        assert_eq!(
            vars,
            vec![
                ("HOME".to_owned(), "/home/alice".to_owned()),
                ("PATH".to_owned(), "/usr/bin:/bin".to_owned()),
                ("TERM".to_owned(), "xterm".to_owned()),
            ]
        );
    }
}
