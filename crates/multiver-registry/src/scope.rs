//! Scope contexts and the version declaration API.
//!
//! A scope is the top-level unit of executing code: one loaded module or
//! file. Its context carries the qualified scope name and the write-once
//! map of version requirements declared in it. The context is an ordinary
//! owned value passed into declaration and resolution calls, never a
//! hidden side channel.

use std::collections::HashMap;

use crate::error::{RegistryError, Result};
use crate::registry::RegistryEntry;

/// Metadata for one calling scope.
#[derive(Debug, Clone)]
pub struct ScopeContext {
    /// Qualified name of the scope's own module.
    name: String,
    /// Whether this context belongs to the scope's top-level code.
    top_level: bool,
    /// Declared library → version requirements. Entries are write-once.
    versions: HashMap<String, String>,
}

impl ScopeContext {
    /// Context for the top-level code of an ordinary (unversioned) module.
    pub fn new(name: impl Into<String>) -> Self {
        ScopeContext {
            name: name.into(),
            top_level: true,
            versions: HashMap::new(),
        }
    }

    /// Context for the top-level code of a mounted registry entry.
    ///
    /// Its name is the entry's internal name, which is what lets the
    /// resolver propagate the entry's version into its own imports.
    pub fn for_entry(entry: &RegistryEntry) -> Self {
        ScopeContext::new(entry.internal_name())
    }

    /// A view of this context for code nested inside a function or block.
    ///
    /// The nested view resolves with a snapshot of the declarations made so
    /// far, but declaring through it always fails.
    pub fn nested(&self) -> Self {
        ScopeContext {
            name: self.name.clone(),
            top_level: false,
            versions: self.versions.clone(),
        }
    }

    /// Qualified name of the scope's own module.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_top_level(&self) -> bool {
        self.top_level
    }

    /// Declare that this scope requires `library` at exactly `version`.
    ///
    /// Must be called from top-level scope code, before the corresponding
    /// import, and at most once per library.
    pub fn declare_version(
        &mut self,
        library: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<()> {
        let library = library.into();
        if !self.top_level {
            return Err(RegistryError::NotTopLevel { library });
        }
        if self.versions.contains_key(&library) {
            return Err(RegistryError::DuplicateDeclaration { library });
        }
        self.versions.insert(library, version.into());
        Ok(())
    }

    /// The version this scope declared for `library`, if any.
    pub fn declared_version(&self, library: &str) -> Option<&str> {
        self.versions.get(library).map(String::as_str)
    }
}
