//! Ordered, name-indexed collection of environments.
//!
//! The registry is filled once by the loader and only read afterwards.
//! `root` is always its first entry.

use std::collections::HashMap;

use chos_common::constants::{CURRENT_ENV, ROOT_ENV};
use chos_common::error::{ChosError, Result};

use crate::environment::Environment;

/// Environments in discovery order, with an exact-name index.
#[derive(Debug, Default)]
pub struct EnvironmentRegistry {
    envs: Vec<Environment>,
    index: HashMap<String, usize>,
}

impl EnvironmentRegistry {
    /// Creates an empty registry. The first [`append`](Self::append) must be `root`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an environment after all existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`ChosError::Config`] if the first environment is not `root`
    /// or if the name is already registered.
    pub fn append(&mut self, env: Environment) -> Result<()> {
        if self.envs.is_empty() && env.name() != ROOT_ENV {
            return Err(ChosError::Config {
                message: format!(
                    "registry must start with {ROOT_ENV:?}, got {:?}",
                    env.name()
                ),
            });
        }
        if self.index.contains_key(env.name()) {
            return Err(ChosError::Config {
                message: format!("environment {:?} defined twice", env.name()),
            });
        }
        tracing::debug!(env = env.name(), binds = env.binds().len(), "registered environment");
        let _ = self.index.insert(env.name().to_owned(), self.envs.len());
        self.envs.push(env);
        Ok(())
    }

    /// Finds an environment by exact, case-sensitive name.
    ///
    /// # Errors
    ///
    /// Returns [`ChosError::EnvironmentNotFound`] if no such environment exists.
    pub fn lookup(&self, name: &str) -> Result<&Environment> {
        self.index
            .get(name)
            .map(|&i| &self.envs[i])
            .ok_or_else(|| ChosError::EnvironmentNotFound { name: name.into() })
    }

    /// The `CURRENT` sentinel, if its configuration file exists.
    #[must_use]
    pub fn current(&self) -> Option<&Environment> {
        self.lookup(CURRENT_ENV).ok()
    }

    /// The anchoring `root` environment.
    #[must_use]
    pub fn root(&self) -> Option<&Environment> {
        self.envs.first()
    }

    /// Environments in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Environment> {
        self.envs.iter()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.envs.iter().map(Environment::name)
    }

    /// Number of registered environments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.envs.len()
    }

    /// Returns `true` before `root` has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::environment::DirectoryBindSet;

    fn env(name: &str) -> Environment {
        Environment::new(name, format!("/etc/chos.d/{name}"), DirectoryBindSet::new())
    }

    #[test]
    fn first_environment_must_be_root() {
        let mut registry = EnvironmentRegistry::new();
        let err = registry.append(env("alt")).unwrap_err();
        assert!(matches!(err, ChosError::Config { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let mut registry = EnvironmentRegistry::new();
        registry.append(env("root")).unwrap();
        registry.append(env("CURRENT")).unwrap();

        assert_eq!(registry.lookup("CURRENT").unwrap().name(), "CURRENT");
        assert!(matches!(
            registry.lookup("current"),
            Err(ChosError::EnvironmentNotFound { .. })
        ));
        assert!(registry.current().is_some());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = EnvironmentRegistry::new();
        registry.append(env("root")).unwrap();
        registry.append(env("alt")).unwrap();
        assert!(registry.append(env("alt")).is_err());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn names_keep_registration_order() {
        let mut registry = EnvironmentRegistry::new();
        for name in ["root", "sl5", "alt", "CURRENT"] {
            registry.append(env(name)).unwrap();
        }
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["root", "sl5", "alt", "CURRENT"]
        );
        assert_eq!(registry.root().unwrap().name(), "root");
    }
}
