//! CLI command definitions and dispatch.

pub mod alias;
pub mod current;
pub mod list;
pub mod switch;

use std::path::PathBuf;

use chos_common::config::ChosConfig;
use chos_common::constants::TRUSTED_UID;
use clap::{Parser, Subcommand};

/// chos — switch this session into another OS environment.
#[derive(Parser, Debug)]
#[command(name = "chos", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding one file per environment.
    #[arg(long, global = true, env = "CHOS_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Site configuration file with %SHELL and %ENV sections.
    #[arg(long, global = true, env = "CHOS_SITE_CONFIG")]
    pub site_config: Option<PathBuf>,

    /// Root-owned JSON file overriding the default paths and mount layout.
    #[arg(long, global = true, env = "CHOS_LAYOUT")]
    pub layout: Option<PathBuf>,

    /// Print debug events to stderr.
    #[arg(short, long, global = true)]
    pub debug: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List configured environments.
    List,
    /// Switch into an environment and run a shell or command there.
    Switch(switch::SwitchArgs),
    /// Print the environment named in the user's marker file.
    Current(current::CurrentArgs),
    /// Print the path registered for a shell alias.
    Alias(alias::AliasArgs),
}

impl Cli {
    /// Builds the effective configuration: defaults, then the layout file,
    /// then flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout file is missing, untrusted, or invalid.
    pub fn config(&self) -> anyhow::Result<ChosConfig> {
        let mut config = match &self.layout {
            Some(path) => ChosConfig::load(path, TRUSTED_UID)?,
            None => ChosConfig::default(),
        };
        if let Some(dir) = &self.config_dir {
            config.config_dir.clone_from(dir);
        }
        if let Some(site) = &self.site_config {
            config.site_config.clone_from(site);
        }
        Ok(config)
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config()?;
    match cli.command {
        Command::List => list::execute(&config),
        Command::Switch(args) => switch::execute(args, &config),
        Command::Current(args) => current::execute(&args, &config),
        Command::Alias(args) => alias::execute(&args, &config),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn switch_collects_trailing_command() {
        let cli = Cli::try_parse_from(["chos", "switch", "sl5", "--", "make", "-j4"]).unwrap();
        match cli.command {
            Command::Switch(args) => {
                assert_eq!(args.env, "sl5");
                assert_eq!(args.command, vec!["make", "-j4"]);
            }
            other => unreachable!("parsed {other:?}"),
        }
    }

    #[test]
    fn flags_override_default_paths() {
        let cli = Cli::try_parse_from(["chos", "--config-dir", "/srv/chos.d", "list"]).unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.config_dir, PathBuf::from("/srv/chos.d"));
        assert_eq!(config.site_config, ChosConfig::default().site_config);
    }

    #[test]
    fn switch_requires_environment_name() {
        assert!(Cli::try_parse_from(["chos", "switch"]).is_err());
    }
}
