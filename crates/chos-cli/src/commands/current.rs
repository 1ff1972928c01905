//! `chos current` — Print the environment named in the marker file.

use std::path::PathBuf;

use anyhow::Context;
use chos_common::config::ChosConfig;
use clap::Args;

/// Arguments for the `current` command.
#[derive(Args, Debug)]
pub struct CurrentArgs {
    /// Home directory to read the marker from (defaults to `$HOME`).
    #[arg(long)]
    pub home: Option<PathBuf>,
}

/// Executes the `current` command.
///
/// # Errors
///
/// Returns an error if no home directory is known or the marker is unreadable.
#[allow(clippy::print_stdout)]
pub fn execute(args: &CurrentArgs, config: &ChosConfig) -> anyhow::Result<()> {
    let home = match &args.home {
        Some(home) => home.clone(),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .context("HOME is not set; pass --home")?,
    };
    let name = chos_core::site::marker::read_marker(&home, &config.marker_file, &config.default_env)?;
    println!("{name}");
    Ok(())
}
