//! In-memory model of environments and their bind mounts.
//!
//! Everything here is built once by the loader and never mutated
//! afterwards. Order inside a [`DirectoryBindSet`] is file order and
//! carries meaning: parents are mounted before the binds nested in them,
//! and torn down after.

use std::path::{Path, PathBuf};

/// One read-only bind mount: a host directory shown at a path in the new root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryBind {
    /// Host directory to expose.
    pub source: PathBuf,
    /// Mount point inside the staging root.
    pub dest: PathBuf,
}

impl DirectoryBind {
    /// Creates a bind from `source` onto `dest`.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
}

/// Ordered binds of one environment.
///
/// Iterate forward to mount, backward (via [`DirectoryBindSet::teardown_order`])
/// to unmount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryBindSet {
    binds: Vec<DirectoryBind>,
}

impl DirectoryBindSet {
    /// Creates an empty bind set.
    #[must_use]
    pub const fn new() -> Self {
        Self { binds: Vec::new() }
    }

    /// Appends a bind after every existing one.
    pub fn push(&mut self, bind: DirectoryBind) {
        self.binds.push(bind);
    }

    /// Returns `true` when the environment mounts nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }

    /// Number of binds in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.binds.len()
    }

    /// Returns the bind at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DirectoryBind> {
        self.binds.get(index)
    }

    /// Returns the bind listed just before `index`.
    #[must_use]
    pub fn predecessor(&self, index: usize) -> Option<&DirectoryBind> {
        index.checked_sub(1).and_then(|i| self.binds.get(i))
    }

    /// Returns the bind listed just after `index`.
    #[must_use]
    pub fn successor(&self, index: usize) -> Option<&DirectoryBind> {
        index.checked_add(1).and_then(|i| self.binds.get(i))
    }

    /// Binds in mount order (file order).
    pub fn iter(&self) -> std::slice::Iter<'_, DirectoryBind> {
        self.binds.iter()
    }

    /// Binds in unmount order: children before their parents.
    pub fn teardown_order(&self) -> std::iter::Rev<std::slice::Iter<'_, DirectoryBind>> {
        self.binds.iter().rev()
    }
}

impl FromIterator<DirectoryBind> for DirectoryBindSet {
    fn from_iter<I: IntoIterator<Item = DirectoryBind>>(iter: I) -> Self {
        Self {
            binds: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DirectoryBindSet {
    type Item = &'a DirectoryBind;
    type IntoIter = std::slice::Iter<'a, DirectoryBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.binds.iter()
    }
}

/// A named OS environment defined by one configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    name: String,
    config_file: PathBuf,
    binds: DirectoryBindSet,
}

impl Environment {
    /// Creates an environment from its parsed configuration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        config_file: impl Into<PathBuf>,
        binds: DirectoryBindSet,
    ) -> Self {
        Self {
            name: name.into(),
            config_file: config_file.into(),
            binds,
        }
    }

    /// Unique environment name (the configuration file's name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the environment was parsed from.
    #[must_use]
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ordered binds applied when switching into this environment.
    #[must_use]
    pub const fn binds(&self) -> &DirectoryBindSet {
        &self.binds
    }
}
