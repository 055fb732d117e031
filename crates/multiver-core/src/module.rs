//! `ModuleObject` — runtime representation of a loaded module or package.
//!
//! A module object is a named, thread-safe attribute container. The loading
//! engine mounts empty module objects into its namespace and an underlying
//! loader populates them; packages link submodules in as `Value::Module`
//! attributes, forming a tree.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::value::Value;

/// Attribute under which every module exposes its own qualified name.
///
/// Always present, so an attribute request for it succeeds on any module.
pub const IDENTITY_ATTR: &str = "__name__";

/// A loaded module with attribute storage.
///
/// Attribute access goes through an `RwLock` so concurrent readers do not
/// contend; the load path (the artifact directory a package was found in)
/// is set once by whoever mounts the module.
#[derive(Debug)]
pub struct ModuleObject {
    /// Fully qualified module name.
    name: Arc<str>,
    /// Module attributes, including submodule links.
    attrs: RwLock<std::collections::HashMap<String, Value>>,
    /// Directory the module's contents load from, for package modules.
    path: RwLock<Option<PathBuf>>,
}

impl ModuleObject {
    /// Create a new empty module with the given qualified name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        let mut attrs = std::collections::HashMap::new();
        attrs.insert(IDENTITY_ATTR.to_string(), Value::string(Arc::clone(&name)));
        ModuleObject {
            name,
            attrs: RwLock::new(attrs),
            path: RwLock::new(None),
        }
    }

    /// Get the fully qualified module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get an attribute, or `None` if it is not bound.
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        self.attrs.read().unwrap().get(name).cloned()
    }

    /// Bind an attribute.
    pub fn set_attr(&self, name: &str, value: Value) {
        self.attrs.write().unwrap().insert(name.to_string(), value);
    }

    /// Check whether an attribute is bound.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.read().unwrap().contains_key(name)
    }

    /// All attribute names, unordered.
    pub fn attr_names(&self) -> Vec<String> {
        self.attrs.read().unwrap().keys().cloned().collect()
    }

    /// Number of bound attributes.
    pub fn len(&self) -> usize {
        self.attrs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.read().unwrap().is_empty()
    }

    /// The directory this module's contents load from, if set.
    pub fn load_path(&self) -> Option<PathBuf> {
        self.path.read().unwrap().clone()
    }

    /// Attach the load directory. Set once at mount time.
    pub fn set_load_path(&self, path: impl AsRef<Path>) {
        *self.path.write().unwrap() = Some(path.as_ref().to_path_buf());
    }
}
