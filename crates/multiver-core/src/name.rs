//! Dotted-name utilities.
//!
//! Qualified module names are dot-separated, `pkg.sub.leaf`. The leading
//! segment identifies the library a reference belongs to.

/// The leading segment of a dotted name.
///
/// For `testlib.utils.io` this is `testlib`; a simple name is its own
/// library identifier.
pub fn library_of(name: &str) -> &str {
    name.split_once('.').map(|(head, _)| head).unwrap_or(name)
}

/// The trailing segment of a dotted name.
pub fn leaf_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, leaf)| leaf).unwrap_or(name)
}

/// The parent of a dotted name, or `None` for a simple name.
pub fn parent_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(parent, _)| parent)
}
