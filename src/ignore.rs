//! Ignore rules for template directories.
//! Files can be skipped by exact basename, and any entry can be skipped by a
//! glob pattern matched against its path relative to the template root.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexSet;
use log::debug;

use crate::error::Result;

/// Names and glob patterns excluded from extraction.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    names: IndexSet<String>,
    globs: Vec<Glob>,
    glob_set: GlobSet,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self { names: IndexSet::new(), globs: Vec::new(), glob_set: GlobSet::empty() }
    }
}

impl IgnoreRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignores every file whose basename equals `name`.
    pub fn add_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!("Ignoring files named '{name}'");
        self.names.insert(name);
    }

    /// Ignores every entry whose relative path matches `pattern`.
    ///
    /// A matching directory takes its whole subtree with it.
    ///
    /// # Errors
    /// * `Error::IgnorePattern` if the glob is invalid
    pub fn add_pattern(&mut self, pattern: &str) -> Result<()> {
        let glob = Glob::new(pattern)?;
        let mut builder = GlobSetBuilder::new();
        for existing in self.globs.iter().chain(std::iter::once(&glob)) {
            builder.add(existing.clone());
        }
        self.glob_set = builder.build()?;
        self.globs.push(glob);
        debug!("Ignoring paths matching '{pattern}'");
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_ignored_name(&self, file_name: &str) -> bool {
        self.names.contains(file_name)
    }

    pub fn matches_pattern(&self, relative_path: &Path) -> bool {
        self.glob_set.is_match(relative_path)
    }
}
