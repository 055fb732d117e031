//! Side-by-side versioned module loading.
//!
//! Lets a process load and use multiple, independently versioned builds of
//! the same named library concurrently. Callers declare, per scope, the
//! exact version of a library they require; the engine resolves that
//! requirement to a version-specific artifact directory, mounts it into an
//! isolated registry space, and redirects subsequent references (including
//! nested imports performed *by* the loaded code) to the isolated copy.
//!
//! # Architecture
//!
//! - `scope` — per-scope version declarations (`ScopeContext`)
//! - `resolver` — pure `(name, scope) → VersionKey` resolution
//! - `key` — version keys and the deterministic internal naming scheme
//! - `registry` — the isolated mount space and the at-most-once loader
//! - `load` — the underlying-loader seam and its manifest-backed default
//! - `interceptor` — the single entry point module references go through
//! - `indirection` — bare-name stand-ins resolving per requesting scope
//!
//! Exact versions only: the engine performs no range resolution and never
//! unloads a mounted version.

pub mod config;
pub mod error;
pub mod indirection;
pub mod interceptor;
pub mod key;
pub mod load;
pub mod manifest;
pub mod registry;
pub mod resolver;
pub mod scope;

// Re-exports for convenience.
pub use config::{SearchPaths, SEARCH_PATH_ENV};
pub use error::{RegistryError, Result};
pub use indirection::{BareNames, IndirectionHandle, IndirectionRef};
pub use interceptor::Interceptor;
pub use key::{VersionKey, SPACE_ROOT};
pub use load::{LoadRequest, ManifestLoader, UnderlyingLoader};
pub use manifest::{ModuleManifest, ModuleMetadata, MANIFEST_FILE};
pub use registry::{Registry, RegistryEntry};
pub use resolver::resolve;
pub use scope::ScopeContext;
