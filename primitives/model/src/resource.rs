//! Resource identity and in-memory resources.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{ModelError, ModelFormat, Result};

/// Canonical absolute-path identity of a model resource.
///
/// Two paths naming the same file (relative segments, `..`, symlinks) produce
/// the same key, which is what lets references written differently in
/// different root files meet in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(PathBuf);

impl ResourceKey {
    /// Build the key of an existing file by canonicalizing its path.
    pub fn canonical(path: &Path) -> Result<Self> {
        std::fs::canonicalize(path)
            .map(ResourceKey)
            .map_err(|source| ModelError::Canonicalize { path: path.to_path_buf(), source })
    }

    /// Key for a resource produced in memory that may never exist on disk.
    ///
    /// The path should be absolute; it is used as-is.
    pub fn produced(path: PathBuf) -> Self { ResourceKey(path) }

    /// The canonical path.
    pub fn path(&self) -> &Path { &self.0 }

    /// File stem of the canonical path (`/a/b/Mesh.uml` → `Mesh`).
    pub fn stem(&self) -> String { path::file_stem_string(&self.0).unwrap_or_default() }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0.display()) }
}

/// A model resource held in memory for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    key: ResourceKey,
    format: ModelFormat,
    package: Option<String>,
    imports: Vec<ResourceKey>,
    text: String,
}

impl Resource {
    /// Create a resource with no package and no imports.
    pub fn new(key: ResourceKey, format: ModelFormat, text: impl Into<String>) -> Self {
        Self { key, format, package: None, imports: Vec::new(), text: text.into() }
    }

    /// Set the declared package.
    pub fn with_package(mut self, package: Option<String>) -> Self {
        self.package = package;
        self
    }

    /// Set the resolved import keys.
    pub fn with_imports(mut self, imports: Vec<ResourceKey>) -> Self {
        self.imports = imports;
        self
    }

    /// Canonical key.
    pub fn key(&self) -> &ResourceKey { &self.key }

    /// Format of the resource.
    pub fn format(&self) -> ModelFormat { self.format }

    /// Declared package (`A.B.C`), if the model declares one.
    pub fn package(&self) -> Option<&str> { self.package.as_deref() }

    /// Keys of the resources this one references, in declaration order.
    pub fn imports(&self) -> &[ResourceKey] { &self.imports }

    /// Raw model text.
    pub fn text(&self) -> &str { &self.text }

    /// Whether this resource belongs to `package` or to a package nested under it.
    ///
    /// `A.B` matches packages `A.B` and `A.B.C`, not `A.BC`. Resources without a
    /// declared package never match.
    pub fn in_package(&self, package: &str) -> bool {
        match self.package() {
            Some(own) => {
                own == package
                    || (own.starts_with(package) && own[package.len()..].starts_with('.'))
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource_in(package: Option<&str>) -> Resource {
        Resource::new(ResourceKey::produced(PathBuf::from("/out/a.m")), ModelFormat::Intermediate, "")
            .with_package(package.map(str::to_string))
    }

    #[test]
    fn test_in_package() {
        assert!(resource_in(Some("A.B")).in_package("A.B"));
        assert!(resource_in(Some("A.B.C")).in_package("A.B"));
        assert!(resource_in(Some("A.B.C")).in_package("A"));
        assert!(!resource_in(Some("A.BC")).in_package("A.B"));
        assert!(!resource_in(Some("A")).in_package("A.B"));
        assert!(!resource_in(None).in_package("A"));
    }

    #[test]
    fn test_canonical_key_identity() {
        let temp = tempfile::tempdir().expect("Failed to create temporary directory");
        std::fs::create_dir_all(temp.path().join("sub")).expect("Failed to create directory");
        let file = temp.path().join("d.m");
        std::fs::write(&file, "package D;").expect("Failed to write model");

        let direct = ResourceKey::canonical(&file).expect("direct key");
        let indirect =
            ResourceKey::canonical(&temp.path().join("sub/../d.m")).expect("indirect key");
        assert_eq!(direct, indirect);
        assert_eq!(direct.stem(), "d");
    }

    #[test]
    fn test_canonical_key_missing_file() {
        let temp = tempfile::tempdir().expect("Failed to create temporary directory");
        match ResourceKey::canonical(&temp.path().join("missing.m")) {
            Err(ModelError::Canonicalize { path, .. }) => assert!(path.ends_with("missing.m")),
            other => panic!("Expected Canonicalize error, got {:?}", other),
        }
    }
}
