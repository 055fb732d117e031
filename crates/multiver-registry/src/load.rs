//! The underlying-loader seam and its filesystem implementation.
//!
//! The engine decides *which* artifact to load; turning a qualified name
//! plus a load root into a populated module object is delegated to an
//! `UnderlyingLoader`. The trait is an injectable dependency so call sites
//! and tests can substitute a fake.
//!
//! `ManifestLoader` is the default implementation: packages are
//! directories carrying a `module.toml` manifest, submodules are
//! subdirectories with their own manifest. For a mounted entry the library
//! package lives *inside* the artifact directory, so `testlib` at version
//! `1.0` populates from `<search path>/testlib-1.0/testlib/module.toml`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use multiver_core::{library_of, ModuleObject, Value};
use tracing::trace;

use crate::config::SearchPaths;
use crate::error::{RegistryError, Result};
use crate::manifest::{ModuleManifest, MANIFEST_FILE};

/// One load request handed to the underlying loader.
#[derive(Debug)]
pub struct LoadRequest<'a> {
    /// Fully qualified (possibly rewritten) name to load.
    pub qualified_name: &'a str,
    /// Artifact directory to load from, for mounted registry entries.
    pub load_root: Option<&'a Path>,
    /// Mounted module object the loaded contents attach under, for
    /// mounted registry entries.
    pub mount: Option<&'a Arc<ModuleObject>>,
    /// Attributes the caller asked for; missing ones that name loadable
    /// submodules are loaded and attached.
    pub attributes: &'a [String],
}

/// External collaborator that turns a qualified name into a loaded module.
///
/// Implementations raise their own not-found errors; the engine forwards
/// them unchanged.
pub trait UnderlyingLoader: Send + Sync {
    fn load(&self, request: &LoadRequest<'_>) -> Result<Arc<ModuleObject>>;
}

/// Manifest-backed filesystem loader.
///
/// Unversioned modules are searched for directly on this loader's own
/// search paths and cached by library, so repeated plain imports observe
/// one instance. Versioned loads never touch that cache: their home is the
/// registry entry they mount under.
pub struct ManifestLoader {
    search_paths: SearchPaths,
    plain: Mutex<HashMap<String, Arc<ModuleObject>>>,
}

impl ManifestLoader {
    pub fn new(search_paths: SearchPaths) -> Self {
        ManifestLoader {
            search_paths,
            plain: Mutex::new(HashMap::new()),
        }
    }

    /// Walk `rest` (dotted segments below `root`) loading one manifest per
    /// segment, attaching each submodule to its parent, returning the leaf.
    fn descend(&self, root: &Arc<ModuleObject>, root_dir: &Path, rest: &str) -> Result<Arc<ModuleObject>> {
        let mut module = Arc::clone(root);
        let mut dir = root_dir.to_path_buf();
        if rest.is_empty() {
            return Ok(module);
        }
        let mut qualified = module.name().to_string();
        for segment in rest.split('.') {
            qualified = format!("{qualified}.{segment}");
            if let Some(Value::Module(existing)) = module.get_attr(segment) {
                dir = existing.load_path().unwrap_or_else(|| dir.join(segment));
                module = existing;
                continue;
            }
            let sub_dir = dir.join(segment);
            if !sub_dir.join(MANIFEST_FILE).is_file() {
                return Err(RegistryError::ModuleNotFound { name: qualified });
            }
            let loaded = self.load_one(&qualified, &sub_dir)?;
            module.set_attr(segment, Value::Module(Arc::clone(&loaded)));
            module = loaded;
            dir = sub_dir;
        }
        Ok(module)
    }

    /// Load a single module object from the manifest in `dir`.
    fn load_one(&self, qualified: &str, dir: &Path) -> Result<Arc<ModuleObject>> {
        let manifest = ModuleManifest::load_from_dir(dir)?;
        let module = Arc::new(ModuleObject::new(qualified.to_string()));
        for (name, value) in manifest.attr_values()? {
            module.set_attr(&name, value);
        }
        module.set_load_path(dir);
        trace!(name = qualified, dir = %dir.display(), "loaded module manifest");
        Ok(module)
    }

    /// Load requested attributes that name submodules not yet attached.
    ///
    /// Attributes that match nothing are left to the caller, matching the
    /// synthesized identity request which is always satisfiable.
    fn satisfy_attributes(&self, module: &Arc<ModuleObject>, attributes: &[String]) -> Result<()> {
        for attribute in attributes {
            if module.has_attr(attribute) {
                continue;
            }
            let Some(dir) = module.load_path() else {
                continue;
            };
            let sub_dir = dir.join(attribute);
            if !sub_dir.join(MANIFEST_FILE).is_file() {
                continue;
            }
            let qualified = format!("{}.{}", module.name(), attribute);
            let loaded = self.load_one(&qualified, &sub_dir)?;
            module.set_attr(attribute, Value::Module(loaded));
        }
        Ok(())
    }

    /// Load an ordinary, unversioned qualified name from the loader's own
    /// search paths.
    fn load_plain(&self, qualified: &str) -> Result<Arc<ModuleObject>> {
        let library = library_of(qualified);
        let root = {
            let mut plain = self.plain.lock().unwrap();
            if let Some(existing) = plain.get(library) {
                Arc::clone(existing)
            } else {
                let dir = self
                    .search_paths
                    .iter()
                    .map(|base| base.join(library))
                    .find(|dir| dir.join(MANIFEST_FILE).is_file())
                    .ok_or_else(|| RegistryError::ModuleNotFound {
                        name: library.to_string(),
                    })?;
                let loaded = self.load_one(library, &dir)?;
                plain.insert(library.to_string(), Arc::clone(&loaded));
                loaded
            }
        };
        let root_dir = root.load_path().unwrap_or_default();
        let rest = qualified.strip_prefix(library).unwrap_or("");
        self.descend(&root, &root_dir, rest.trim_start_matches('.'))
    }
}

impl UnderlyingLoader for ManifestLoader {
    fn load(&self, request: &LoadRequest<'_>) -> Result<Arc<ModuleObject>> {
        let module = match (request.mount, request.load_root) {
            (Some(mount), Some(load_root)) => {
                let rest = request
                    .qualified_name
                    .strip_prefix(mount.name())
                    .map(|rest| rest.trim_start_matches('.'))
                    .ok_or_else(|| RegistryError::ModuleNotFound {
                        name: request.qualified_name.to_string(),
                    })?;
                self.descend(mount, load_root, rest)?
            }
            _ => self.load_plain(request.qualified_name)?,
        };
        self.satisfy_attributes(&module, request.attributes)?;
        Ok(module)
    }
}
