//! Site configuration consumed around the switch.
//!
//! The site file (default `/etc/chos`) is split into `%`-headed sections.
//! `%SHELL` maps aliases to paths for the login wrapper, `%ENV` lists the
//! variables carried into the switched session. The per-user marker file
//! names the environment a session should start in.

pub mod alias;
pub mod env;
pub mod marker;

use std::io::{BufRead, BufReader};
use std::path::Path;

use chos_common::error::{ChosError, Result};

use crate::trust::open_trusted;

/// Returns the lines of section `header` in the site file at `path`.
///
/// A section runs from the line equal to `header` up to the next line
/// starting with `%`. Blank lines and `#` comments are dropped. A missing
/// section yields no lines.
///
/// # Errors
///
/// Returns an error if the file is missing, untrusted, or unreadable.
pub fn read_section(path: &Path, trusted_uid: u32, header: &str) -> Result<Vec<String>> {
    let file = open_trusted(path, trusted_uid)?;
    let mut lines = Vec::new();
    let mut inside = false;

    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| ChosError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if inside {
            if line.starts_with('%') {
                break;
            }
            lines.push(line);
        } else if line == header {
            inside = true;
        }
    }

    tracing::debug!(path = %path.display(), section = header, lines = lines.len(), "read site section");
    Ok(lines)
}
