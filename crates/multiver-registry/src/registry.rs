//! The registry namespace and the version loader.
//!
//! One process-wide `Registry` owns the isolated space every loaded
//! version mounts into. Mounting is keyed by `VersionKey` and happens at
//! most once per key; the check-then-act sequence runs entirely under the
//! registry mutex so two threads cannot race to mount the same key twice
//! or observe a partially mounted entry.
//!
//! The loader's job ends at making an entry discoverable: it locates the
//! artifact directory, mounts an empty module object at the deterministic
//! internal name, and attaches the directory as the entry's load root.
//! Populating the entry's contents is delegated to the underlying loader.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use multiver_core::{ModuleObject, Value};
use tracing::debug;

use crate::config::SearchPaths;
use crate::error::{RegistryError, Result};
use crate::key::{VersionKey, SPACE_ROOT};

/// A mounted version of a library.
///
/// Exactly one entry exists per `VersionKey` for the life of the process;
/// it is created on first successful load and never replaced or removed.
#[derive(Debug)]
pub struct RegistryEntry {
    key: VersionKey,
    internal_name: String,
    load_root: PathBuf,
    module: Arc<ModuleObject>,
}

impl RegistryEntry {
    pub fn key(&self) -> &VersionKey {
        &self.key
    }

    /// The deterministic internal name the entry is mounted under.
    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    /// The artifact directory the entry loads from.
    pub fn load_root(&self) -> &Path {
        &self.load_root
    }

    /// The mounted module object.
    pub fn module(&self) -> &Arc<ModuleObject> {
        &self.module
    }
}

/// The process-wide registry of side-by-side loaded versions.
#[derive(Debug)]
pub struct Registry {
    search_paths: SearchPaths,
    /// Root module object of the isolated space. Only `ensure_mounted`
    /// adds entries here.
    space: Arc<ModuleObject>,
    mounted: Mutex<HashMap<VersionKey, Arc<RegistryEntry>>>,
}

impl Registry {
    /// Create a registry over an explicit search-path list.
    pub fn new(search_paths: SearchPaths) -> Self {
        Registry {
            search_paths,
            space: Arc::new(ModuleObject::new(SPACE_ROOT)),
            mounted: Mutex::new(HashMap::new()),
        }
    }

    /// Create a registry over the ambient environment configuration.
    pub fn from_env() -> Self {
        Registry::new(SearchPaths::from_env())
    }

    pub fn search_paths(&self) -> &SearchPaths {
        &self.search_paths
    }

    /// The space root module all entries mount under.
    pub fn space(&self) -> &Arc<ModuleObject> {
        &self.space
    }

    /// Mount the artifact for `key`, or return the existing entry.
    ///
    /// Idempotent: an already-mounted key returns its entry without
    /// touching the filesystem. Otherwise the search paths are scanned in
    /// order for a directory named `<library>-<version>`; the first match
    /// wins. A failed mount leaves no trace in the registry.
    pub fn ensure_mounted(&self, key: &VersionKey) -> Result<Arc<RegistryEntry>> {
        let mut mounted = self.mounted.lock().unwrap();
        if let Some(entry) = mounted.get(key) {
            return Ok(Arc::clone(entry));
        }

        let dir_name = key.artifact_dir_name();
        for base in self.search_paths.iter() {
            let load_root = base.join(&dir_name);
            if !load_root.is_dir() {
                continue;
            }

            let internal_name = key.internal_name();
            let module = Arc::new(ModuleObject::new(internal_name.clone()));
            module.set_load_path(&load_root);
            self.space
                .set_attr(&key.internal_leaf(), Value::Module(Arc::clone(&module)));

            let entry = Arc::new(RegistryEntry {
                key: key.clone(),
                internal_name,
                load_root: load_root.clone(),
                module,
            });
            mounted.insert(key.clone(), Arc::clone(&entry));
            debug!(key = %key, root = %load_root.display(), "mounted registry entry");
            return Ok(entry);
        }

        Err(RegistryError::VersionNotFound {
            library: key.library.clone(),
            version: key.version.clone(),
        })
    }

    /// The entry for `key`, if mounted.
    pub fn entry(&self, key: &VersionKey) -> Option<Arc<RegistryEntry>> {
        self.mounted.lock().unwrap().get(key).cloned()
    }

    pub fn is_mounted(&self, key: &VersionKey) -> bool {
        self.mounted.lock().unwrap().contains_key(key)
    }

    /// All mounted keys, unordered.
    pub fn mounted_keys(&self) -> Vec<VersionKey> {
        self.mounted.lock().unwrap().keys().cloned().collect()
    }

    /// Versions of `library` with an artifact directory on some search
    /// path, sorted and deduplicated. Discovery only; nothing is mounted.
    pub fn available_versions(&self, library: &str) -> Vec<String> {
        let prefix = format!("{library}-");
        let mut versions = Vec::new();
        for base in self.search_paths.iter() {
            let Ok(entries) = std::fs::read_dir(base) else {
                continue;
            };
            for entry in entries.flatten() {
                if !entry.path().is_dir() {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    if let Some(version) = name.strip_prefix(&prefix) {
                        if !version.is_empty() {
                            versions.push(version.to_string());
                        }
                    }
                }
            }
        }
        versions.sort();
        versions.dedup();
        versions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn registry_with(dirs: &[&tempfile::TempDir]) -> Registry {
        Registry::new(dirs.iter().map(|d| d.path().to_path_buf()).collect())
    }

    fn add_artifact(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    #[test]
    fn mount_finds_artifact_directory() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = add_artifact(&dir, "testlib-1.0");
        let registry = registry_with(&[&dir]);

        let key = VersionKey::new("testlib", "1.0");
        let entry = registry.ensure_mounted(&key).unwrap();
        assert_eq!(entry.load_root(), artifact.as_path());
        assert_eq!(entry.internal_name(), key.internal_name());
        assert_eq!(entry.module().load_path().unwrap(), artifact);
        assert!(registry.is_mounted(&key));
        // Mounted into the space under the internal leaf.
        let slot = registry.space().get_attr(&key.internal_leaf()).unwrap();
        assert!(Arc::ptr_eq(slot.as_module().unwrap(), entry.module()));
    }

    #[test]
    fn mount_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        add_artifact(&dir, "testlib-1.0");
        let registry = registry_with(&[&dir]);

        let key = VersionKey::new("testlib", "1.0");
        let first = registry.ensure_mounted(&key).unwrap();
        // Removing the artifact makes a second filesystem scan impossible,
        // proving the second call never leaves the map.
        std::fs::remove_dir_all(dir.path().join("testlib-1.0")).unwrap();
        let second = registry.ensure_mounted(&key).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.mounted_keys().len(), 1);
    }

    #[test]
    fn first_search_path_match_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let winning = add_artifact(&first, "testlib-1.0");
        add_artifact(&second, "testlib-1.0");
        let registry = registry_with(&[&first, &second]);

        let entry = registry
            .ensure_mounted(&VersionKey::new("testlib", "1.0"))
            .unwrap();
        assert_eq!(entry.load_root(), winning.as_path());
    }

    #[test]
    fn later_path_is_used_when_earlier_misses() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let artifact = add_artifact(&second, "testlib-2.0");
        let registry = registry_with(&[&first, &second]);

        let entry = registry
            .ensure_mounted(&VersionKey::new("testlib", "2.0"))
            .unwrap();
        assert_eq!(entry.load_root(), artifact.as_path());
    }

    #[test]
    fn missing_version_fails_and_leaves_no_state() {
        let dir = tempfile::tempdir().unwrap();
        add_artifact(&dir, "testlib-1.0");
        let registry = registry_with(&[&dir]);

        let key = VersionKey::new("missinglib", "9.9");
        let err = registry.ensure_mounted(&key).unwrap_err();
        assert!(matches!(
            &err,
            RegistryError::VersionNotFound { library, version }
                if library == "missinglib" && version == "9.9"
        ));
        assert!(!registry.is_mounted(&key));
        assert!(registry.space().get_attr(&key.internal_leaf()).is_none());
        assert!(registry.mounted_keys().is_empty());
    }

    #[test]
    fn distinct_versions_mount_distinct_entries() {
        let dir = tempfile::tempdir().unwrap();
        add_artifact(&dir, "testlib-1.0");
        add_artifact(&dir, "testlib-2.0");
        let registry = registry_with(&[&dir]);

        let v1 = registry
            .ensure_mounted(&VersionKey::new("testlib", "1.0"))
            .unwrap();
        let v2 = registry
            .ensure_mounted(&VersionKey::new("testlib", "2.0"))
            .unwrap();
        assert!(!Arc::ptr_eq(&v1, &v2));
        assert!(!Arc::ptr_eq(v1.module(), v2.module()));
        assert_eq!(registry.mounted_keys().len(), 2);
    }

    #[test]
    fn concurrent_mounts_yield_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        add_artifact(&dir, "testlib-1.0");
        let registry = Arc::new(registry_with(&[&dir]));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry
                        .ensure_mounted(&VersionKey::new("testlib", "1.0"))
                        .unwrap()
                })
            })
            .collect();

        let entries: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for entry in &entries[1..] {
            assert!(Arc::ptr_eq(&entries[0], entry));
        }
        assert_eq!(registry.mounted_keys().len(), 1);
    }

    #[test]
    fn available_versions_across_paths() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        add_artifact(&first, "testlib-1.0");
        add_artifact(&first, "testlib-2.0");
        add_artifact(&second, "testlib-2.0");
        add_artifact(&second, "testlib-0.5");
        add_artifact(&second, "otherlib-1.0");
        let registry = registry_with(&[&first, &second]);

        assert_eq!(registry.available_versions("testlib"), ["0.5", "1.0", "2.0"]);
        assert_eq!(registry.available_versions("otherlib"), ["1.0"]);
        assert!(registry.available_versions("nosuchlib").is_empty());
    }
}
