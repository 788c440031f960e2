//! Which loaded resources are emitted as output.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use model::{Resource, ResourceKey};

/// Resources emitted by a generation step, in root order.
///
/// Resources loaded only to satisfy references never enter the scope.
#[derive(Debug, Clone, Default)]
pub struct GenerationScope {
    resources: Vec<Rc<Resource>>,
}

impl GenerationScope {
    /// Compute the scope of `roots`.
    ///
    /// # Arguments
    /// * `roots` - Loaded input resources, in input order
    /// * `generate_all` - Inputs came from a directory: a root imported by another root is
    ///   only a dependency and is left out
    /// * `package` - Keep only resources in this package or nested under it
    pub fn compute(roots: &[Rc<Resource>], generate_all: bool, package: Option<&str>) -> Self {
        let imported: HashSet<&ResourceKey> = if generate_all {
            roots
                .iter()
                .flat_map(|root| root.imports().iter().filter(move |key| *key != root.key()))
                .collect()
        } else {
            HashSet::new()
        };

        let mut seen = HashSet::new();
        let resources = roots
            .iter()
            .filter(|root| !imported.contains(root.key()))
            .filter(|root| package.map_or(true, |package| root.in_package(package)))
            .filter(|root| seen.insert(root.key().clone()))
            .map(Rc::clone)
            .collect();

        Self { resources }
    }

    /// First pair of in-scope resources sharing a file stem, in scope order.
    ///
    /// Every output file is named after its model's stem, so such a pair cannot
    /// be emitted into one directory.
    pub fn stem_collision(&self) -> Option<(&ResourceKey, &ResourceKey)> {
        let mut by_stem: HashMap<String, &ResourceKey> = HashMap::new();
        for resource in &self.resources {
            let key = resource.key();
            if let Some(first) = by_stem.insert(key.stem(), key) {
                return Some((first, key));
            }
        }
        None
    }

    /// In-scope resources.
    pub fn resources(&self) -> &[Rc<Resource>] { &self.resources }

    /// Keys of the in-scope resources.
    pub fn keys(&self) -> Vec<ResourceKey> {
        self.resources.iter().map(|resource| resource.key().clone()).collect()
    }

    /// Number of in-scope resources.
    pub fn len(&self) -> usize { self.resources.len() }

    /// Whether nothing is in scope.
    pub fn is_empty(&self) -> bool { self.resources.is_empty() }
}
