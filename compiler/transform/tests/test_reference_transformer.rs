use std::fs;
use std::path::Path;

use model::{IntermediateModelParser, ResourceIdentityCache, ResourceLoader, ResourceParser, XmlModelParser};
use modane_transform::{ModelTransformer, ReferenceTransformer, TransformOptions};

fn uml(name: &str, imports: &[&str]) -> String {
    let mut body = String::new();
    for import in imports {
        body.push_str(&format!(
            "  <packageImport><importedPackage href=\"{import}#_root\"/></packageImport>\n"
        ));
    }
    format!(
        "<uml:Model xmlns:uml=\"http://www.eclipse.org/uml2/5.0.0/UML\" name=\"{name}\">\n{body}</uml:Model>\n"
    )
}

#[test]
fn test_transformed_models_parse_back_with_their_imports() {
    let temp = tempfile::tempdir().expect("Failed to create temporary directory");
    let dir = temp.path();
    fs::write(dir.join("Types.uml"), uml("Arcane.Types", &[])).expect("write Types");
    fs::write(dir.join("Mesh.uml"), uml("Arcane.Mesh", &["Types.uml"])).expect("write Mesh");

    let loader = ResourceLoader::new(XmlModelParser);
    let mut cache = ResourceIdentityCache::new();
    let mesh = loader.load(&dir.join("Mesh.uml"), &mut cache).expect("load Mesh");
    let deps = loader.dependencies(&mesh, &cache);

    let out = ReferenceTransformer::new()
        .transform(&mesh, &deps, TransformOptions::default())
        .expect("transform");

    let parsed = IntermediateModelParser
        .parse(Path::new(&out.file_name), &out.text)
        .expect("intermediate text parses");
    assert_eq!(parsed.package.as_deref(), Some("Arcane.Mesh"));
    assert_eq!(parsed.references, vec!["Types.m".to_string()]);
}

#[test]
fn test_transformation_is_deterministic() {
    let temp = tempfile::tempdir().expect("Failed to create temporary directory");
    fs::write(temp.path().join("Solver.uml"), uml("Solver", &[])).expect("write Solver");

    let loader = ResourceLoader::new(XmlModelParser);
    let mut cache = ResourceIdentityCache::new();
    let solver = loader.load(&temp.path().join("Solver.uml"), &mut cache).expect("load");

    let transformer = ReferenceTransformer::new();
    let first = transformer.transform(&solver, &[], TransformOptions::default()).expect("first");
    let second = transformer.transform(&solver, &[], TransformOptions::default()).expect("second");
    assert_eq!(first, second);
}
