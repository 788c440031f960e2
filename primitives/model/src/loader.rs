//! Cache-aware recursive loading.

use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use crate::{ModelError, ModelFormat, Resource, ResourceIdentityCache, ResourceKey, Result};

/// What a format parser extracts from one model file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResource {
    /// Declared package, if any
    pub package: Option<String>,
    /// Cross-file references, relative to the referencing file, first occurrence order
    pub references: Vec<String>,
}

impl ParsedResource {
    /// Record a reference once.
    pub fn push_reference(&mut self, reference: &str) {
        if !self.references.iter().any(|r| r == reference) {
            self.references.push(reference.to_string());
        }
    }
}

/// Format-specific scanner for packages and cross-file references.
pub trait ResourceParser {
    /// Format this parser reads.
    fn format(&self) -> ModelFormat;

    /// Scan `text`, read from `path`.
    fn parse(&self, path: &Path, text: &str) -> Result<ParsedResource>;
}

/// Loads model files and everything they reference through a [`ResourceIdentityCache`].
pub struct ResourceLoader<P> {
    parser: P,
}

impl<P: ResourceParser> ResourceLoader<P> {
    /// Create a loader over `parser`.
    pub fn new(parser: P) -> Self { Self { parser } }

    /// The underlying parser.
    pub fn parser(&self) -> &P { &self.parser }

    /// Load `path` and, transitively, every file it references.
    ///
    /// Keys already resident in `cache` are returned without being read again.
    /// Reference cycles are tolerated: a key currently being loaded is not
    /// re-entered.
    pub fn load(&self, path: &Path, cache: &mut ResourceIdentityCache) -> Result<Rc<Resource>> {
        let key = ResourceKey::canonical(path)?;
        let mut in_progress = HashSet::new();
        self.load_key(key, cache, &mut in_progress)
    }

    /// Resident resources imported by `resource`; see [`ResourceIdentityCache::dependencies_of`].
    pub fn dependencies(
        &self,
        resource: &Resource,
        cache: &ResourceIdentityCache,
    ) -> Vec<Rc<Resource>> {
        cache.dependencies_of(resource)
    }

    fn load_key(
        &self,
        key: ResourceKey,
        cache: &mut ResourceIdentityCache,
        in_progress: &mut HashSet<ResourceKey>,
    ) -> Result<Rc<Resource>> {
        if let Some(resident) = cache.get(&key) {
            tracing::debug!("cache hit {}", key);
            return Ok(resident);
        }

        tracing::debug!("loading {} model {}", self.parser.format(), key);
        let text = std::fs::read_to_string(key.path())
            .map_err(|source| ModelError::Read { path: key.path().to_path_buf(), source })?;
        let parsed = self.parser.parse(key.path(), &text)?;
        let imports = resolve_references(&key, &parsed.references)?;

        in_progress.insert(key.clone());
        for import in &imports {
            if !in_progress.contains(import) {
                self.load_key(import.clone(), cache, in_progress)?;
            }
        }

        let resource = Rc::new(
            Resource::new(key, self.parser.format(), text)
                .with_package(parsed.package)
                .with_imports(imports),
        );
        cache.insert(Rc::clone(&resource))?;
        Ok(resource)
    }
}

/// Turn relative references into canonical keys, dropping duplicates and self references.
fn resolve_references(from: &ResourceKey, references: &[String]) -> Result<Vec<ResourceKey>> {
    let base = from.path().parent().unwrap_or_else(|| Path::new("/"));
    let mut keys: Vec<ResourceKey> = Vec::with_capacity(references.len());

    for reference in references {
        let key = ResourceKey::canonical(&base.join(reference)).map_err(|_| {
            ModelError::UnresolvedReference { from: from.clone(), reference: reference.clone() }
        })?;
        if &key != from && !keys.contains(&key) {
            keys.push(key);
        }
    }

    Ok(keys)
}
