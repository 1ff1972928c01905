//! `chos list` — Show the configured environments.

use chos_common::config::ChosConfig;
use chos_core::EnvironmentRegistry;

/// Executes the `list` command: one name per line, in registration order.
///
/// # Errors
///
/// Returns an error if the configuration directory cannot be loaded.
#[allow(clippy::print_stdout)]
pub fn execute(config: &ChosConfig) -> anyhow::Result<()> {
    let registry = chos_core::configure(config)?;
    print!("{}", render(&registry));
    Ok(())
}

fn render(registry: &EnvironmentRegistry) -> String {
    registry.names().fold(String::new(), |mut out, name| {
        out.push_str(name);
        out.push('\n');
        out
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chos_core::{DirectoryBind, Environment};

    use super::*;

    #[test]
    fn names_follow_registration_order() {
        let mut registry = EnvironmentRegistry::new();
        for (name, binds) in [
            ("root", Vec::new()),
            ("sl5", vec![DirectoryBind::new("/opt/sl5", "/chos2/usr")]),
            ("CURRENT", Vec::new()),
            ("alt", Vec::new()),
        ] {
            let env = Environment::new(name, format!("/etc/chos.d/{name}"), binds.into_iter().collect());
            registry.append(env).unwrap();
        }

        assert_eq!(render(&registry), "root\nsl5\nCURRENT\nalt\n");
    }
}
