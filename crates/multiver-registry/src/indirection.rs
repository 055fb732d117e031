//! Bare-name indirection.
//!
//! After a versioned load, the library's bare (unversioned) name would
//! otherwise stay bound to whichever version happened to load first. The
//! engine instead installs a lightweight `IndirectionHandle` at the bare
//! slot. The handle re-derives the version key from the *accessing* scope
//! on every attribute access, so the same bare name resolves to different
//! versions depending on who asks.
//!
//! Slot lifetime is explicit reference counting, not finalizer timing:
//! `lookup` hands out `IndirectionRef` guards, and dropping the last
//! outstanding guard detaches the slot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use multiver_core::Value;
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::registry::Registry;
use crate::resolver;
use crate::scope::ScopeContext;

/// Forwarding stand-in installed at a library's bare global slot.
///
/// Holds no strong ownership of any registry entry; it only knows how to
/// find the right one for a requesting scope.
#[derive(Debug)]
pub struct IndirectionHandle {
    library: String,
    registry: Arc<Registry>,
}

impl IndirectionHandle {
    pub fn new(library: impl Into<String>, registry: Arc<Registry>) -> Self {
        IndirectionHandle {
            library: library.into(),
            registry,
        }
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    /// Forward an attribute access to the version the requesting scope
    /// resolves to.
    ///
    /// The key is re-derived from `requesting_scope` with the same
    /// resolver logic used for imports; a scope that resolves to no key,
    /// an unmounted key, or a missing attribute all surface as an
    /// ordinary missing-attribute failure.
    pub fn resolve_attribute(
        &self,
        attribute: &str,
        requesting_scope: &ScopeContext,
    ) -> Result<Value> {
        let unresolved = || RegistryError::AttributeUnresolved {
            library: self.library.clone(),
            attribute: attribute.to_string(),
        };

        let key = resolver::resolve(&self.library, requesting_scope).ok_or_else(unresolved)?;
        let entry = self.registry.entry(&key).ok_or_else(unresolved)?;
        let package = match entry.module().get_attr(&self.library) {
            Some(Value::Module(package)) => package,
            _ => return Err(unresolved()),
        };
        package.get_attr(attribute).ok_or_else(unresolved)
    }
}

/// A counted reference to an installed indirection handle.
///
/// Dropping the last guard for a library clears its bare-name slot.
#[derive(Debug)]
pub struct IndirectionRef {
    table: Arc<BareNames>,
    handle: Arc<IndirectionHandle>,
}

impl std::ops::Deref for IndirectionRef {
    type Target = IndirectionHandle;

    fn deref(&self) -> &IndirectionHandle {
        &self.handle
    }
}

impl Drop for IndirectionRef {
    fn drop(&mut self) {
        self.table.release(self.handle.library());
    }
}

#[derive(Debug)]
struct Slot {
    handle: Arc<IndirectionHandle>,
    refs: usize,
}

/// The process-wide table of bare-name slots.
///
/// One slot per library identifier. The engine only ever installs
/// indirection handles here, never concrete modules.
#[derive(Debug, Default)]
pub struct BareNames {
    slots: Mutex<HashMap<String, Slot>>,
}

impl BareNames {
    pub fn new() -> Self {
        BareNames::default()
    }

    /// Install a handle at the library's slot if nothing occupies it.
    ///
    /// Returns whether the handle was installed.
    pub fn install_if_vacant(&self, handle: IndirectionHandle) -> bool {
        let mut slots = self.slots.lock().unwrap();
        if slots.contains_key(handle.library()) {
            return false;
        }
        debug!(library = handle.library(), "installed bare-name indirection");
        slots.insert(
            handle.library().to_string(),
            Slot {
                handle: Arc::new(handle),
                refs: 0,
            },
        );
        true
    }

    /// Acquire a counted reference to the library's installed handle.
    pub fn lookup(self: &Arc<Self>, library: &str) -> Option<IndirectionRef> {
        let mut slots = self.slots.lock().unwrap();
        let slot = slots.get_mut(library)?;
        slot.refs += 1;
        Some(IndirectionRef {
            table: Arc::clone(self),
            handle: Arc::clone(&slot.handle),
        })
    }

    pub fn is_occupied(&self, library: &str) -> bool {
        self.slots.lock().unwrap().contains_key(library)
    }

    /// Detach callback: drop one reference, clearing the slot when the
    /// last outstanding guard goes away.
    fn release(&self, library: &str) {
        let mut slots = self.slots.lock().unwrap();
        if let Some(slot) = slots.get_mut(library) {
            slot.refs -= 1;
            if slot.refs == 0 {
                slots.remove(library);
                debug!(library, "detached bare-name indirection");
            }
        }
    }
}
