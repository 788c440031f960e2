use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use modane_model::{
    IntermediateModelParser, ModelError, ModelFormat, ParsedResource, ResourceIdentityCache,
    ResourceLoader, ResourceParser, XmlModelParser,
};

/// Parser wrapper counting how many times each file is parsed
#[derive(Default)]
struct CountingParser {
    parses: RefCell<BTreeMap<PathBuf, usize>>,
}

impl CountingParser {
    fn count_for(&self, name: &str) -> usize {
        self.parses
            .borrow()
            .iter()
            .filter(|(path, _)| path.file_name().and_then(|n| n.to_str()) == Some(name))
            .map(|(_, count)| *count)
            .sum()
    }
}

impl ResourceParser for CountingParser {
    fn format(&self) -> ModelFormat { ModelFormat::Intermediate }

    fn parse(&self, path: &Path, text: &str) -> modane_model::Result<ParsedResource> {
        *self.parses.borrow_mut().entry(path.to_path_buf()).or_default() += 1;
        IntermediateModelParser.parse(path, text)
    }
}

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, text).expect("Failed to write model");
}

#[test]
fn test_shared_import_is_loaded_once_and_shared_by_reference() {
    let temp = tempfile::tempdir().expect("Failed to create temporary directory");
    let root = temp.path();
    write(&root.join("a/A.m"), "package A;\nimport \"../shared/D.m\";\n");
    write(&root.join("C.m"), "package C;\nimport \"shared/D.m\";\n");
    write(&root.join("shared/D.m"), "package D;\n");

    let loader = ResourceLoader::new(CountingParser::default());
    let mut cache = ResourceIdentityCache::new();

    let a = loader.load(&root.join("a/A.m"), &mut cache).expect("load A");
    let c = loader.load(&root.join("C.m"), &mut cache).expect("load C");

    assert_eq!(loader.parser().count_for("D.m"), 1);
    assert_eq!(cache.len(), 3);

    let d_from_a = loader.dependencies(&a, &cache);
    let d_from_c = loader.dependencies(&c, &cache);
    assert_eq!(d_from_a.len(), 1);
    assert_eq!(d_from_c.len(), 1);
    assert!(Rc::ptr_eq(&d_from_a[0], &d_from_c[0]));
    assert_eq!(d_from_a[0].package(), Some("D"));
}

#[test]
fn test_reloading_a_root_hits_the_cache() {
    let temp = tempfile::tempdir().expect("Failed to create temporary directory");
    write(&temp.path().join("A.m"), "package A;\n");

    let loader = ResourceLoader::new(CountingParser::default());
    let mut cache = ResourceIdentityCache::new();
    let first = loader.load(&temp.path().join("A.m"), &mut cache).expect("first load");
    let second = loader.load(&temp.path().join("./A.m"), &mut cache).expect("second load");

    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(loader.parser().count_for("A.m"), 1);
}

#[test]
fn test_reference_cycles_terminate() {
    let temp = tempfile::tempdir().expect("Failed to create temporary directory");
    write(&temp.path().join("A.m"), "import \"B.m\";\n");
    write(&temp.path().join("B.m"), "import \"A.m\";\n");

    let loader = ResourceLoader::new(IntermediateModelParser);
    let mut cache = ResourceIdentityCache::new();
    let a = loader.load(&temp.path().join("A.m"), &mut cache).expect("load A");

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.dependencies_of(&a).len(), 1);
    let b = cache.dependencies_of(&a).remove(0);
    assert_eq!(b.imports(), &[a.key().clone()]);
}

#[test]
fn test_unresolved_reference_is_reported() {
    let temp = tempfile::tempdir().expect("Failed to create temporary directory");
    write(&temp.path().join("A.m"), "import \"Missing.m\";\n");

    let loader = ResourceLoader::new(IntermediateModelParser);
    let mut cache = ResourceIdentityCache::new();
    match loader.load(&temp.path().join("A.m"), &mut cache) {
        Err(ModelError::UnresolvedReference { reference, .. }) => {
            assert_eq!(reference, "Missing.m")
        }
        other => panic!("Expected UnresolvedReference, got {:?}", other),
    }
    assert!(cache.is_empty());
}

#[test]
fn test_xml_models_share_referenced_files() {
    let temp = tempfile::tempdir().expect("Failed to create temporary directory");
    let types = r#"<uml:Model xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML" name="Types"/>"#;
    let user = |name: &str| {
        format!(
            r#"<uml:Model xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML" name="{name}">
  <packageImport><importedPackage href="Types.uml#_types"/></packageImport>
</uml:Model>"#
        )
    };
    write(&temp.path().join("Types.uml"), types);
    write(&temp.path().join("Mesh.uml"), &user("Mesh"));
    write(&temp.path().join("Solver.uml"), &user("Solver"));

    let loader = ResourceLoader::new(XmlModelParser);
    let mut cache = ResourceIdentityCache::new();
    let mesh = loader.load(&temp.path().join("Mesh.uml"), &mut cache).expect("load Mesh");
    let solver = loader.load(&temp.path().join("Solver.uml"), &mut cache).expect("load Solver");

    assert_eq!(cache.len(), 3);
    assert!(Rc::ptr_eq(&cache.dependencies_of(&mesh)[0], &cache.dependencies_of(&solver)[0]));
    assert_eq!(mesh.format(), ModelFormat::Xml);
}
