//! Ignore-list filtering applied during a scan.
//!
//! Sort order itself lives on [`crate::entry::Tree`] (`SortKey`, `sort_subtree`) since it
//! operates directly on arena nodes; this module holds the walker-facing ignore
//! predicate, which only needs plain path comparisons.

use std::path::{Path, PathBuf};

/// A set of absolute path prefixes the walker should not descend into.
///
/// Matching is prefix-based on path components (not a glob or regex engine), mirroring
/// the teacher's own simple string-based filtering style.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    prefixes: Vec<PathBuf>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        IgnoreSet::default()
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        IgnoreSet {
            prefixes: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add(&mut self, path: impl Into<PathBuf>) {
        self.prefixes.push(path.into());
    }

    /// True if `path` is equal to, or nested under, any ignored prefix.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
