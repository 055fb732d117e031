//! Core runtime data structures for the multiver loading engine.
//!
//! This crate knows nothing about versions, search paths, or interception.
//! It provides the module object (a thread-safe attribute container that
//! stands in for a loaded module or package), the attribute value type, and
//! dotted-name utilities shared by the rest of the workspace.

pub mod module;
pub mod name;
pub mod value;

// Re-exports for convenience.
pub use module::{ModuleObject, IDENTITY_ATTR};
pub use name::{leaf_of, library_of, parent_of};
pub use value::Value;
