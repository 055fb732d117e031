//! Engine error types.

/// Errors that can occur while declaring, resolving, or loading versions.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Version requirement declared from nested (non-top-level) code.
    #[error("version requirement for '{library}' must be declared at scope top level")]
    NotTopLevel { library: String },

    /// The same library declared twice within one scope.
    #[error("version requirement for '{library}' already declared in this scope")]
    DuplicateDeclaration { library: String },

    /// No artifact directory for this version on any search path.
    #[error("version {version} of '{library}' not found on any search path")]
    VersionNotFound { library: String, version: String },

    /// The underlying loader could not find an unversioned module.
    #[error("module not found: {name}")]
    ModuleNotFound { name: String },

    /// A bare-name indirection could not forward an attribute access.
    #[error("attribute '{attribute}' of '{library}' cannot be resolved for the requesting scope")]
    AttributeUnresolved { library: String, attribute: String },

    /// Invalid module manifest.
    #[error("invalid module manifest: {detail}")]
    InvalidManifest { detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    /// Whether this is a "not found" style failure callers may handle with
    /// ordinary not-found logic.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::VersionNotFound { .. } | RegistryError::ModuleNotFound { .. }
        )
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_not_found_names_both_parts() {
        let err = RegistryError::VersionNotFound {
            library: "missinglib".to_string(),
            version: "9.9".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("missinglib"));
        assert!(msg.contains("9.9"));
        assert!(err.is_not_found());
    }

    #[test]
    fn configuration_errors_are_not_not_found() {
        let err = RegistryError::DuplicateDeclaration {
            library: "testlib".to_string(),
        };
        assert!(!err.is_not_found());
    }
}
