//! Per-run resource identity cache.
//!
//! Contract for every loading call:
//!
//! 1. look the key up before loading; a hit returns the resident `Rc` and
//!    performs no I/O;
//! 2. on a miss, load, then insert under the key;
//! 3. identity is by reference: all holders of a key share one allocation.
//!
//! The cache is owned by a single orchestrator run and passed by `&mut`; the
//! run is single-threaded so no synchronization is involved.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{ModelError, Resource, ResourceKey, Result};

/// Set of resources already produced in the current run, keyed canonically.
#[derive(Debug, Default)]
pub struct ResourceIdentityCache {
    resources: HashMap<ResourceKey, Rc<Resource>>,
    order: Vec<ResourceKey>,
}

impl ResourceIdentityCache {
    /// Create an empty cache.
    pub fn new() -> Self { Self::default() }

    /// The resident resource for `key`, if any.
    pub fn get(&self, key: &ResourceKey) -> Option<Rc<Resource>> {
        self.resources.get(key).map(Rc::clone)
    }

    /// Whether `key` has already been loaded or produced.
    pub fn contains(&self, key: &ResourceKey) -> bool { self.resources.contains_key(key) }

    /// Insert a freshly loaded resource.
    ///
    /// Fails if the key is already resident; callers must look up first.
    pub fn insert(&mut self, resource: Rc<Resource>) -> Result<()> {
        let key = resource.key().clone();
        if self.resources.contains_key(&key) {
            return Err(ModelError::DuplicateResource(key));
        }
        tracing::debug!("cache insert {}", key);
        self.order.push(key.clone());
        self.resources.insert(key, resource);
        Ok(())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> &[ResourceKey] { &self.order }

    /// Resident resources referenced by `resource`, in import order.
    ///
    /// Imports that are not resident (never loaded) are skipped.
    pub fn dependencies_of(&self, resource: &Resource) -> Vec<Rc<Resource>> {
        resource.imports().iter().filter_map(|key| self.get(key)).collect()
    }

    /// Number of resident resources.
    pub fn len(&self) -> usize { self.order.len() }

    /// Whether nothing has been loaded yet.
    pub fn is_empty(&self) -> bool { self.order.is_empty() }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::ModelFormat;

    fn produced(name: &str, imports: &[&str]) -> Rc<Resource> {
        let key = ResourceKey::produced(PathBuf::from(format!("/out/{name}.m")));
        let imports = imports
            .iter()
            .map(|i| ResourceKey::produced(PathBuf::from(format!("/out/{i}.m"))))
            .collect();
        Rc::new(Resource::new(key, ModelFormat::Intermediate, "").with_imports(imports))
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut cache = ResourceIdentityCache::new();
        assert!(cache.is_empty());

        let d = produced("d", &[]);
        cache.insert(Rc::clone(&d)).expect("first insert");

        let hit = cache.get(d.key()).expect("resident");
        assert!(Rc::ptr_eq(&hit, &d));
        assert!(cache.contains(d.key()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut cache = ResourceIdentityCache::new();
        cache.insert(produced("d", &[])).expect("first insert");

        match cache.insert(produced("d", &[])) {
            Err(ModelError::DuplicateResource(key)) => assert_eq!(key.stem(), "d"),
            other => panic!("Expected DuplicateResource, got {:?}", other),
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_dependencies_follow_import_order() {
        let mut cache = ResourceIdentityCache::new();
        let b = produced("b", &[]);
        let c = produced("c", &[]);
        let a = produced("a", &["c", "missing", "b"]);
        cache.insert(Rc::clone(&b)).expect("insert b");
        cache.insert(Rc::clone(&c)).expect("insert c");
        cache.insert(Rc::clone(&a)).expect("insert a");

        let deps = cache.dependencies_of(&a);
        assert_eq!(deps.len(), 2);
        assert!(Rc::ptr_eq(&deps[0], &c));
        assert!(Rc::ptr_eq(&deps[1], &b));

        let order: Vec<_> = cache.keys().iter().map(ResourceKey::stem).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }
}
