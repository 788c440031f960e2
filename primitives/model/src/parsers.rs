//! Reference scanners for the two loadable model formats.
//!
//! Neither parser understands its format beyond what orchestration needs: the
//! declared package and the files a model points at.

use std::path::Path;
use std::sync::OnceLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

use crate::{ModelError, ModelFormat, ParsedResource, ResourceParser, Result};

/// Scanner for EMF UML XML models.
///
/// The package is the `name` of the first `Model` element. References are
/// `href` attributes of the form `other.uml#fragment`; library URIs such as
/// `pathmap://...` are not files and are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlModelParser;

impl ResourceParser for XmlModelParser {
    fn format(&self) -> ModelFormat { ModelFormat::Xml }

    fn parse(&self, path: &Path, text: &str) -> Result<ParsedResource> {
        let syntax = |message: String| ModelError::Syntax { path: path.to_path_buf(), message };
        let mut reader = Reader::from_str(text);
        let mut parsed = ParsedResource::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                    if parsed.package.is_none() && element.local_name().as_ref() == b"Model" {
                        parsed.package = attribute_value(&element, b"name").map_err(syntax)?;
                    }
                    if let Some(href) = attribute_value(&element, b"href").map_err(syntax)? {
                        if let Some(file) = referenced_file(&href) {
                            parsed.push_reference(file);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(syntax(format!("at byte {}: {}", reader.buffer_position(), e)));
                }
            }
        }

        Ok(parsed)
    }
}

/// Unescaped value of the attribute whose local name is `name`.
fn attribute_value(
    element: &BytesStart<'_>,
    name: &[u8],
) -> std::result::Result<Option<String>, String> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        if attribute.key.local_name().as_ref() == name {
            let value = attribute.unescape_value().map_err(|e| e.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// File part of an `href`, or `None` for intra-document and library references.
fn referenced_file(href: &str) -> Option<&str> {
    let file = href.split('#').next().unwrap_or_default();
    if file.is_empty() || file.contains(':') {
        return None;
    }
    Some(file)
}

/// Scanner for Modane intermediate models.
///
/// Recognized statements, one per line:
///
/// ```text
/// package A.B.C;
/// import "relative/path/Other.m";
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IntermediateModelParser;

fn package_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*package\s+([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*;")
            .expect("package pattern is valid")
    })
}

fn import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\s*import\s+"([^"]+)"\s*;"#).expect("import pattern is valid")
    })
}

impl ResourceParser for IntermediateModelParser {
    fn format(&self) -> ModelFormat { ModelFormat::Intermediate }

    fn parse(&self, _path: &Path, text: &str) -> Result<ParsedResource> {
        let mut parsed = ParsedResource::default();

        for line in text.lines() {
            if let Some(captures) = package_pattern().captures(line) {
                if parsed.package.is_none() {
                    parsed.package = Some(captures[1].to_string());
                }
            } else if let Some(captures) = import_pattern().captures(line) {
                parsed.push_reference(&captures[1]);
            }
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_parser_collects_package_and_hrefs() {
        let text = r##"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmi:version="20131001" xmlns:xmi="http://www.omg.org/spec/XMI/20131001" xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML">
  <uml:Model xmi:id="_root" name="Arcane.Mesh">
    <packageImport xmi:id="_i1">
      <importedPackage href="../common/Types.uml#_types"/>
    </packageImport>
    <packagedElement xmi:type="uml:Class" xmi:id="_c1" name="Cell">
      <generalization general="_local"/>
      <ownedAttribute xmi:id="_a1" name="id">
        <type href="pathmap://UML_LIBRARIES/UMLPrimitiveTypes.library.uml#Integer"/>
      </ownedAttribute>
      <ownedAttribute xmi:id="_a2" name="node">
        <type href="../common/Types.uml#_node"/>
      </ownedAttribute>
      <ownedAttribute xmi:id="_a3" name="self">
        <type href="#_c1"/>
      </ownedAttribute>
    </packagedElement>
  </uml:Model>
</xmi:XMI>"##;

        let parsed = XmlModelParser.parse(Path::new("/m/mesh/Mesh.uml"), text).expect("parse");
        assert_eq!(parsed.package.as_deref(), Some("Arcane.Mesh"));
        assert_eq!(parsed.references, vec!["../common/Types.uml".to_string()]);
    }

    #[test]
    fn test_xml_parser_reports_malformed_input() {
        let result = XmlModelParser.parse(Path::new("/m/bad.uml"), "<uml:Model name=\"A\"></other>");
        match result {
            Err(ModelError::Syntax { path, .. }) => assert!(path.ends_with("bad.uml")),
            other => panic!("Expected Syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_intermediate_parser() {
        let text = r#"
// Mesh description
package Arcane.Mesh;

import "common/Types.m";
import "Geometry.m";
import "common/Types.m";
   import "Tools.m" ;
importer "Nope.m";
"#;
        let parsed = IntermediateModelParser.parse(Path::new("/m/Mesh.m"), text).expect("parse");
        assert_eq!(parsed.package.as_deref(), Some("Arcane.Mesh"));
        assert_eq!(
            parsed.references,
            vec!["common/Types.m".to_string(), "Geometry.m".to_string(), "Tools.m".to_string()]
        );
    }

    #[test]
    fn test_intermediate_parser_without_package() {
        let parsed =
            IntermediateModelParser.parse(Path::new("/m/x.m"), "import \"y.m\";").expect("parse");
        assert_eq!(parsed.package, None);
        assert_eq!(parsed.references, vec!["y.m".to_string()]);
    }
}
