//! Version keys and the deterministic internal naming scheme.
//!
//! Every loaded version of a library is identified by a `VersionKey` and
//! mounted in the registry space under an internal name that encodes the
//! key. The version string is hex-encoded so the leaf is a syntactically
//! valid name segment regardless of what characters the version contains.

use serde::{Deserialize, Serialize};

/// Qualified name of the registry space all versioned entries mount under.
pub const SPACE_ROOT: &str = "multiver.space";

/// Separator between library identifier and hex version in internal leaf
/// names: `testlib___312e30` is `testlib` at version `1.0`.
const VERSION_SEP: &str = "___";

/// Separator between library and version in on-disk artifact directory
/// names: `testlib-1.0`.
const ARTIFACT_SEP: char = '-';

/// Identifying pair naming a specific loadable artifact.
///
/// Equality and hashing are structural; the version is an opaque string,
/// never interpreted as a range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionKey {
    /// Library identifier (the leading dotted segment of a reference).
    pub library: String,
    /// Exact version string, as declared.
    pub version: String,
}

impl VersionKey {
    pub fn new(library: impl Into<String>, version: impl Into<String>) -> Self {
        VersionKey {
            library: library.into(),
            version: version.into(),
        }
    }

    /// The artifact directory name this key maps to on disk.
    pub fn artifact_dir_name(&self) -> String {
        format!("{}{}{}", self.library, ARTIFACT_SEP, self.version)
    }

    /// The leaf name this key mounts under inside the registry space.
    pub fn internal_leaf(&self) -> String {
        format!(
            "{}{}{}",
            self.library,
            VERSION_SEP,
            hex_encode(self.version.as_bytes())
        )
    }

    /// The fully qualified internal name of this key's registry entry.
    pub fn internal_name(&self) -> String {
        format!("{}.{}", SPACE_ROOT, self.internal_leaf())
    }

    /// Prefix a requested qualified name with this key's internal namespace
    /// path, producing the rewritten name handed to the underlying loader.
    pub fn rewrite_import_name(&self, requested: &str) -> String {
        format!("{}.{}", self.internal_name(), requested)
    }

    /// Recover the key encoded in a qualified name inside the registry
    /// space, or `None` if the name lives outside it or decodes to nothing.
    pub fn from_internal_name(qualified: &str) -> Option<VersionKey> {
        let rest = qualified
            .strip_prefix(SPACE_ROOT)?
            .strip_prefix('.')?;
        let leaf = rest.split('.').next()?;
        let (library, hex) = leaf.rsplit_once(VERSION_SEP)?;
        if library.is_empty() {
            return None;
        }
        let version = hex_decode(hex)?;
        Some(VersionKey::new(library, version))
    }
}

impl std::fmt::Display for VersionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.library, self.version)
    }
}

/// Encode bytes as lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a lowercase hex string back into the original version string.
fn hex_decode(hex: &str) -> Option<String> {
    if hex.is_empty() || hex.len() % 2 != 0 {
        return None;
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let pair = hex.get(i..i + 2)?;
        bytes.push(u8::from_str_radix(pair, 16).ok()?);
    }
    String::from_utf8(bytes).ok()
}
