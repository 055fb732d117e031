//! The import interceptor — the single entry point module references pass
//! through.
//!
//! The interceptor is an explicit object owned by whoever wires the
//! process together: initialized once, handed around as a dependency, and
//! never reset. It consults the resolver; unversioned references fall
//! through to the underlying loader untouched, versioned ones are
//! rewritten into the registry space, mounted, loaded, and get a bare-name
//! indirection installed for later unqualified look-ups.

use std::sync::Arc;

use multiver_core::{ModuleObject, IDENTITY_ATTR};
use tracing::trace;

use crate::error::Result;
use crate::indirection::{BareNames, IndirectionHandle};
use crate::load::{LoadRequest, UnderlyingLoader};
use crate::registry::Registry;
use crate::resolver;
use crate::scope::ScopeContext;

/// Intercepts module references and redirects versioned ones into the
/// registry space.
pub struct Interceptor {
    registry: Arc<Registry>,
    loader: Arc<dyn UnderlyingLoader>,
    bare: Arc<BareNames>,
}

impl Interceptor {
    pub fn new(registry: Arc<Registry>, loader: Arc<dyn UnderlyingLoader>) -> Self {
        Interceptor {
            registry,
            loader,
            bare: Arc::new(BareNames::new()),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The bare-name slot table indirections are installed into.
    pub fn bare_names(&self) -> &Arc<BareNames> {
        &self.bare
    }

    /// Resolve and load a module reference made from `scope`.
    ///
    /// Unversioned references are forwarded to the underlying loader
    /// verbatim. Versioned references are rewritten under the registry
    /// space, mounted at most once, and loaded from the entry's artifact
    /// directory; when the caller requested no attributes a request for
    /// the module's own identity is synthesized so partial-package imports
    /// still resolve. The concrete loaded module is always returned, never
    /// the indirection — the indirection only serves *future* unqualified
    /// look-ups by other code.
    pub fn intercept(
        &self,
        requested_name: &str,
        scope: &ScopeContext,
        attributes: &[String],
    ) -> Result<Arc<ModuleObject>> {
        let Some(key) = resolver::resolve(requested_name, scope) else {
            return self.loader.load(&LoadRequest {
                qualified_name: requested_name,
                load_root: None,
                mount: None,
                attributes,
            });
        };

        let entry = self.registry.ensure_mounted(&key)?;
        let rewritten = key.rewrite_import_name(requested_name);
        trace!(requested = requested_name, rewritten = %rewritten, "rewrote versioned import");

        let identity = [IDENTITY_ATTR.to_string()];
        let attributes = if attributes.is_empty() {
            &identity[..]
        } else {
            attributes
        };

        let module = self.loader.load(&LoadRequest {
            qualified_name: &rewritten,
            load_root: Some(entry.load_root()),
            mount: Some(entry.module()),
            attributes,
        })?;

        self.bare.install_if_vacant(IndirectionHandle::new(
            key.library.clone(),
            Arc::clone(&self.registry),
        ));

        Ok(module)
    }
}
