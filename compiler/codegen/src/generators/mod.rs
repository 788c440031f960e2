//! Reference C++ and CMake generators.

/// Header/source pair per intermediate model
pub mod cpp;
pub use cpp::CppGenerator;

/// CMake fragments and the top-level `CMakeLists.txt`
pub mod cmake;

/// Turn a model name into a C++ identifier.
///
/// ASCII alphanumerics and `_` are kept, everything else becomes `_`, and a
/// leading digit is prefixed with `_`. Returns `None` when nothing usable remains.
pub fn cpp_identifier(name: &str) -> Option<String> {
    let mut ident: String =
        name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect();
    if ident.chars().all(|c| c == '_') {
        return None;
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    Some(ident)
}
