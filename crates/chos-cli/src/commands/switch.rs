//! `chos switch` — Move this session into an environment.
//!
//! Everything read from the base system (environment files, the site
//! `%ENV` section, the working directory) is gathered before the first
//! kernel call, because the old root is out of reach afterwards.

use std::ffi::CString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chos_common::config::ChosConfig;
use chos_core::site::env::materialize_env;
use chos_core::{KernelMounts, MountOrchestrator};
use clap::Args;
use nix::unistd::{execvpe, getgid, getuid, setgid, setuid};

/// Arguments for the `switch` command.
#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// Environment to switch into.
    pub env: String,

    /// Command to run inside the environment (defaults to `$SHELL`).
    #[arg(last = true)]
    pub command: Vec<String>,
}

/// Executes the `switch` command. Only returns on failure.
///
/// # Errors
///
/// Returns an error if loading, switching, dropping privileges, or `exec`
/// fails. After a failed switch the mount namespace is left as-is and the
/// process exits.
pub fn execute(args: SwitchArgs, config: &ChosConfig) -> anyhow::Result<()> {
    let registry = chos_core::configure(config).context("failed to initialize chos")?;
    let mut vars = materialize_env(&config.site_config, config.trusted_uid, &config.default_path, |name| {
        std::env::var(name).ok()
    })?;
    vars.push(("CHOS".to_owned(), args.env.clone()));
    let cwd = std::env::current_dir().ok();
    let argv = command_line(args.command, std::env::var("SHELL").ok());

    let mut orchestrator = MountOrchestrator::new(&registry, &config.layout, KernelMounts);
    let env = orchestrator
        .switch_to(&args.env)
        .with_context(|| format!("failed to switch to environment {}", args.env))?;

    drop_privileges()?;
    restore_cwd(cwd.as_deref());

    tracing::info!(env = env.name(), command = ?argv, "starting session");
    exec(&argv, &vars)
}

fn command_line(command: Vec<String>, shell: Option<String>) -> Vec<String> {
    if command.is_empty() {
        vec![shell.unwrap_or_else(|| "/bin/sh".to_owned())]
    } else {
        command
    }
}

fn drop_privileges() -> anyhow::Result<()> {
    setgid(getgid()).context("setgid")?;
    setuid(getuid()).context("setuid")?;
    Ok(())
}

fn restore_cwd(cwd: Option<&Path>) {
    let target = cwd.map_or_else(|| PathBuf::from("/"), Path::to_path_buf);
    if let Err(e) = chos_core::filesystem::pivot_root::change_dir(&target) {
        tracing::warn!(error = %e, "staying in /");
    }
}

fn exec(argv: &[String], vars: &[(String, String)]) -> anyhow::Result<()> {
    let argv = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .context("command contains a NUL byte")?;
    let envp = vars
        .iter()
        .map(|(name, value)| CString::new(format!("{name}={value}")))
        .collect::<Result<Vec<_>, _>>()
        .context("environment contains a NUL byte")?;
    let program = argv.first().context("empty command")?;

    let Err(err) = execvpe(program, &argv, &envp);
    Err(anyhow::Error::new(err).context(format!("exec {}", program.to_string_lossy())))
}
