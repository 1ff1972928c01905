//! `chos alias` — Resolve a `%SHELL` alias to its path.

use chos_common::config::ChosConfig;
use clap::Args;

/// Arguments for the `alias` command.
#[derive(Args, Debug)]
pub struct AliasArgs {
    /// Alias to look up.
    pub name: String,
}

/// Executes the `alias` command.
///
/// # Errors
///
/// Returns an error if the site file is unusable or the alias is unknown.
#[allow(clippy::print_stdout)]
pub fn execute(args: &AliasArgs, config: &ChosConfig) -> anyhow::Result<()> {
    let path = chos_core::site::alias::resolve_alias(&config.site_config, config.trusted_uid, &args.name)?
        .ok_or_else(|| anyhow::anyhow!("no alias {:?} in {}", args.name, config.site_config.display()))?;
    println!("{}", path.display());
    Ok(())
}
