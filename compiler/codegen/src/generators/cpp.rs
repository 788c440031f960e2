use std::fmt::Write as _;

use model::Resource;

use super::{cmake, cpp_identifier};
use crate::{CodeGenerator, CodegenError, GenerationRequest, Result};

const BANNER: &str = "// Generated by modane-headless. Do not edit.";

/// Emits `<stem>.h` / `<stem>.cc` for every in-scope model, plus CMake files on request.
///
/// Each model becomes a `<Stem>Base` class inside the namespaces of its
/// package; imported models become `#include`s. Output depends only on the
/// request, so regenerating into a clean directory is byte-identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppGenerator;

impl CppGenerator {
    /// Create a new CppGenerator
    pub fn new() -> Self { Self }
}

impl CodeGenerator for CppGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<Vec<(String, String)>> {
        let mut files = Vec::new();
        let mut stems = Vec::with_capacity(request.resources.len());

        for resource in request.resources {
            let stem = resource.key().stem();
            let class = cpp_identifier(&stem)
                .ok_or_else(|| CodegenError::InvalidName(resource.key().to_string()))?;
            tracing::debug!("generating C++ for {}", resource.key());

            files.push((format!("{stem}.h"), render_header(resource, &stem, &class, request)?));
            files.push((format!("{stem}.cc"), render_source(resource, &stem, &class, request)?));
            if request.flags.cmakes {
                files.push((format!("{stem}.cmake"), cmake::render_fragment(&stem)?));
            }
            stems.push(stem);
        }

        if request.flags.cmakelists {
            files.push((
                "CMakeLists.txt".to_string(),
                cmake::render_lists(request.package, &stems, request.flags.cmakes)?,
            ));
        }

        Ok(files)
    }
}

fn namespaces(resource: &Resource) -> Vec<String> {
    resource.package().map(|p| p.split('.').filter_map(cpp_identifier).collect()).unwrap_or_default()
}

fn include_guard(namespaces: &[String], class: &str) -> String {
    let mut parts = vec!["MODANE".to_string()];
    parts.extend(namespaces.iter().cloned());
    parts.push(class.to_string());
    parts.push("H".to_string());
    parts.join("_").to_ascii_uppercase()
}

fn render_header(
    resource: &Resource,
    stem: &str,
    class: &str,
    request: &GenerationRequest<'_>,
) -> Result<String> {
    let namespaces = namespaces(resource);
    let guard = include_guard(&namespaces, class);
    let mut out = String::new();

    writeln!(out, "{BANNER}")?;
    writeln!(out, "// Source model: {stem}.m")?;
    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)?;
    for import in resource.imports() {
        writeln!(out, "#include \"{}.h\"", import.stem())?;
    }
    if !resource.imports().is_empty() {
        writeln!(out)?;
    }
    for ns in &namespaces {
        writeln!(out, "namespace {ns} {{")?;
    }
    if !namespaces.is_empty() {
        writeln!(out)?;
    }

    writeln!(out, "class {class}Base")?;
    writeln!(out, "{{")?;
    writeln!(out, " public:")?;
    writeln!(out, "  {class}Base() = default;")?;
    writeln!(out, "  virtual ~{class}Base() = default;")?;
    writeln!(out)?;
    writeln!(out, "  virtual void build();")?;
    if request.flags.scihook || request.flags.profacc {
        writeln!(out)?;
        writeln!(out, " protected:")?;
    }
    if request.flags.scihook {
        writeln!(out, "  virtual void scihookNotify(const char* event) const;")?;
    }
    if request.flags.profacc {
        writeln!(out, "  virtual void profileRegionBegin(const char* name) const;")?;
        writeln!(out, "  virtual void profileRegionEnd(const char* name) const;")?;
    }
    writeln!(out, "}};")?;

    if !namespaces.is_empty() {
        writeln!(out)?;
    }
    for ns in namespaces.iter().rev() {
        writeln!(out, "}}  // namespace {ns}")?;
    }
    writeln!(out)?;
    writeln!(out, "#endif  // {guard}")?;
    Ok(out)
}

fn render_source(
    resource: &Resource,
    stem: &str,
    class: &str,
    request: &GenerationRequest<'_>,
) -> Result<String> {
    let flags = request.flags;
    let namespaces = namespaces(resource);
    let mut out = String::new();

    writeln!(out, "{BANNER}")?;
    writeln!(out, "#include \"{stem}.h\"")?;
    writeln!(out)?;
    for ns in &namespaces {
        writeln!(out, "namespace {ns} {{")?;
    }
    if !namespaces.is_empty() {
        writeln!(out)?;
    }

    writeln!(out, "void {class}Base::build()")?;
    writeln!(out, "{{")?;
    if flags.scihook {
        writeln!(out, "  scihookNotify(\"{class}.build.before\");")?;
    }
    if flags.profacc {
        writeln!(out, "  profileRegionBegin(\"{class}.build\");")?;
        writeln!(out, "  profileRegionEnd(\"{class}.build\");")?;
    }
    if flags.scihook {
        writeln!(out, "  scihookNotify(\"{class}.build.after\");")?;
    }
    writeln!(out, "}}")?;

    if flags.scihook {
        writeln!(out)?;
        writeln!(out, "void {class}Base::scihookNotify(const char* event) const")?;
        writeln!(out, "{{")?;
        writeln!(out, "  (void)event;")?;
        writeln!(out, "}}")?;
    }
    if flags.profacc {
        for hook in ["profileRegionBegin", "profileRegionEnd"] {
            writeln!(out)?;
            writeln!(out, "void {class}Base::{hook}(const char* name) const")?;
            writeln!(out, "{{")?;
            writeln!(out, "  (void)name;")?;
            writeln!(out, "}}")?;
        }
    }

    if !namespaces.is_empty() {
        writeln!(out)?;
    }
    for ns in namespaces.iter().rev() {
        writeln!(out, "}}  // namespace {ns}")?;
    }
    Ok(out)
}
