//! Repository search list
//!
//! An ordered list of base locations searched for resource paths. Newly
//! added repositories take precedence over existing ones.

use crate::names::NameList;

/// Repositories searched when none are configured
pub const DEFAULT_REPOSITORIES: [&str; 2] = [".", "lib"];

/// Ordered repository search list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryList {
    entries: Vec<String>,
}

impl Default for RepositoryList {
    fn default() -> Self {
        Self::new(DEFAULT_REPOSITORIES.iter().map(|s| s.to_string()).collect())
    }
}

impl RepositoryList {
    /// Create a list searched in the given order
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Create an empty list
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Prepend repositories to the search list
    ///
    /// Entries are flattened first. The first given entry is searched first,
    /// and all new entries are searched before the existing ones. Duplicates
    /// are kept.
    pub fn add(&mut self, entries: impl Into<NameList>) {
        let mut added = entries.into().flatten();
        added.append(&mut self.entries);
        self.entries = added;
    }

    /// Iterate repositories in search order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Repositories in search order
    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    /// Check if a repository is in the list
    pub fn contains(&self, repository: &str) -> bool {
        self.entries.iter().any(|e| e == repository)
    }

    /// Number of repositories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
