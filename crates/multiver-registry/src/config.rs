//! Ambient search-path configuration.
//!
//! The loader consults an ordered list of directories supplied by the host
//! environment; order is significant, first match wins.

use std::path::{Path, PathBuf};

/// Environment variable holding the default search-path list, in the
/// platform's path-list syntax (`:`-separated on Unix).
pub const SEARCH_PATH_ENV: &str = "MULTIVER_PATH";

/// An ordered sequence of directories the loader scans for artifacts.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    entries: Vec<PathBuf>,
}

impl SearchPaths {
    /// Build from an explicit ordered list.
    pub fn new(entries: Vec<PathBuf>) -> Self {
        SearchPaths { entries }
    }

    /// Read the ambient configuration from [`SEARCH_PATH_ENV`].
    ///
    /// An unset variable yields an empty list.
    pub fn from_env() -> Self {
        let entries = std::env::var_os(SEARCH_PATH_ENV)
            .map(|raw| std::env::split_paths(&raw).collect())
            .unwrap_or_default();
        SearchPaths { entries }
    }

    /// Append a directory at the end of the list (lowest priority).
    pub fn push(&mut self, entry: impl Into<PathBuf>) {
        self.entries.push(entry.into());
    }

    /// The entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<PathBuf> for SearchPaths {
    fn from_iter<T: IntoIterator<Item = PathBuf>>(iter: T) -> Self {
        SearchPaths {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_order() {
        let mut paths = SearchPaths::new(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        paths.push("/c");
        let collected: Vec<_> = paths.iter().collect();
        assert_eq!(
            collected,
            vec![Path::new("/a"), Path::new("/b"), Path::new("/c")]
        );
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn default_is_empty() {
        assert!(SearchPaths::default().is_empty());
    }
}
