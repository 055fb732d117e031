//! Cache key resolution.
//!
//! A pure function from a requested name plus the calling scope's metadata
//! to the `VersionKey` the reference should load under, or `None` for an
//! ordinary unversioned reference. No side effects; safe to call
//! repeatedly and concurrently.

use multiver_core::library_of;

use crate::key::VersionKey;
use crate::scope::ScopeContext;

/// Derive the version key for a reference made from the given scope.
///
/// Resolution order:
/// 1. the scope's own declared mapping for the requested library;
/// 2. the key encoded in the scope's own name, when the scope is itself a
///    mounted registry entry (version-context propagation);
/// 3. `None` — ordinary unversioned import.
pub fn resolve(requested_name: &str, scope: &ScopeContext) -> Option<VersionKey> {
    let library = library_of(requested_name);
    if let Some(version) = scope.declared_version(library) {
        return Some(VersionKey::new(library, version));
    }
    VersionKey::from_internal_name(scope.name())
}
