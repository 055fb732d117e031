//! Module manifest parsing for filesystem-backed packages.
//!
//! A package directory carries a `module.toml` describing the module and
//! the attributes it exports. Submodules are subdirectories with their own
//! manifest.

use std::collections::BTreeMap;
use std::path::Path;

use multiver_core::Value;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// File name of a package manifest inside its directory.
pub const MANIFEST_FILE: &str = "module.toml";

/// A parsed package manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Module metadata (required).
    pub module: ModuleMetadata,
    /// Exported attributes: name → scalar value.
    #[serde(default)]
    pub attrs: BTreeMap<String, toml::Value>,
}

/// Core module metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleMetadata {
    /// Module name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ModuleManifest {
    /// Parse a manifest from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        let manifest: ModuleManifest = toml::from_str(text)?;
        if manifest.module.name.is_empty() {
            return Err(RegistryError::InvalidManifest {
                detail: "module name must not be empty".to_string(),
            });
        }
        Ok(manifest)
    }

    /// Read and parse the manifest file in `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(dir.join(MANIFEST_FILE))?;
        ModuleManifest::parse(&text)
    }

    /// Convert the exported attributes into module attribute values.
    ///
    /// Only scalars are representable; anything else is a manifest error.
    pub fn attr_values(&self) -> Result<Vec<(String, Value)>> {
        let mut values = Vec::with_capacity(self.attrs.len());
        for (name, raw) in &self.attrs {
            let value = match raw {
                toml::Value::String(s) => Value::string(s.as_str()),
                toml::Value::Integer(i) => Value::Int(*i),
                toml::Value::Float(f) => Value::Float(*f),
                toml::Value::Boolean(b) => Value::Bool(*b),
                other => {
                    return Err(RegistryError::InvalidManifest {
                        detail: format!(
                            "attribute '{name}' has unsupported type {}",
                            other.type_str()
                        ),
                    })
                }
            };
            values.push((name.clone(), value));
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal() {
        let manifest = ModuleManifest::parse("[module]\nname = \"testlib\"\n").unwrap();
        assert_eq!(manifest.module.name, "testlib");
        assert!(manifest.module.description.is_none());
        assert!(manifest.attrs.is_empty());
    }

    #[test]
    fn parse_with_attrs() {
        let manifest = ModuleManifest::parse(
            "[module]\nname = \"testlib\"\ndescription = \"demo\"\n\n\
             [attrs]\ndata = \"one point oh\"\ncount = 3\nratio = 0.5\nenabled = true\n",
        )
        .unwrap();
        let values = manifest.attr_values().unwrap();
        assert_eq!(values.len(), 4);
        let data = values.iter().find(|(n, _)| n == "data").unwrap();
        assert_eq!(data.1.as_str(), Some("one point oh"));
        let count = values.iter().find(|(n, _)| n == "count").unwrap();
        assert_eq!(count.1.as_int(), Some(3));
    }

    #[test]
    fn reject_empty_name() {
        assert!(ModuleManifest::parse("[module]\nname = \"\"\n").is_err());
    }

    #[test]
    fn reject_missing_module_table() {
        assert!(ModuleManifest::parse("[attrs]\nx = 1\n").is_err());
    }

    #[test]
    fn reject_non_scalar_attr() {
        let manifest =
            ModuleManifest::parse("[module]\nname = \"m\"\n\n[attrs]\nxs = [1, 2]\n").unwrap();
        let err = manifest.attr_values().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidManifest { .. }));
    }

    #[test]
    fn load_from_dir_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            "[module]\nname = \"ondisk\"\n\n[attrs]\nversion_tag = \"v1\"\n",
        )
        .unwrap();
        let manifest = ModuleManifest::load_from_dir(dir.path()).unwrap();
        assert_eq!(manifest.module.name, "ondisk");
    }
}
