use std::fmt::Write as _;

use super::cpp_identifier;
use crate::Result;

const BANNER: &str = "# Generated by modane-headless. Do not edit.";

/// Name of the CMake variable listing the sources of `stem`.
pub fn sources_variable(stem: &str) -> String {
    format!("{}_SOURCES", cpp_identifier(stem).unwrap_or_default().to_ascii_uppercase())
}

/// `<stem>.cmake`: a fragment declaring the model's sources.
pub fn render_fragment(stem: &str) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{BANNER}")?;
    writeln!(out, "set({}", sources_variable(stem))?;
    writeln!(out, "  ${{CMAKE_CURRENT_LIST_DIR}}/{stem}.cc")?;
    writeln!(out, "  ${{CMAKE_CURRENT_LIST_DIR}}/{stem}.h")?;
    writeln!(out, ")")?;
    Ok(out)
}

/// Top-level `CMakeLists.txt` building every generated model into one library.
///
/// With `use_fragments`, the per-model fragments are included and their
/// source variables used instead of listing files directly.
pub fn render_lists(package: Option<&str>, stems: &[String], use_fragments: bool) -> Result<String> {
    let target = package
        .map(|p| p.split('.').filter_map(cpp_identifier).collect::<Vec<_>>().join("_"))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "modane_generated".to_string());

    let mut out = String::new();
    writeln!(out, "{BANNER}")?;
    writeln!(out, "cmake_minimum_required(VERSION 3.21)")?;
    writeln!(out, "project({target} LANGUAGES CXX)")?;
    writeln!(out)?;
    if use_fragments {
        for stem in stems {
            writeln!(out, "include(${{CMAKE_CURRENT_LIST_DIR}}/{stem}.cmake)")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "add_library({target}")?;
    for stem in stems {
        if use_fragments {
            writeln!(out, "  ${{{}}}", sources_variable(stem))?;
        } else {
            writeln!(out, "  {stem}.cc")?;
            writeln!(out, "  {stem}.h")?;
        }
    }
    writeln!(out, ")")?;
    writeln!(out, "target_include_directories({target} PUBLIC ${{CMAKE_CURRENT_SOURCE_DIR}})")?;
    writeln!(out, "target_compile_features({target} PUBLIC cxx_std_17)")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment() {
        let fragment = render_fragment("Mesh").expect("render");
        assert!(fragment.contains("set(MESH_SOURCES\n  ${CMAKE_CURRENT_LIST_DIR}/Mesh.cc\n"));
    }

    #[test]
    fn test_lists_target_follows_package_filter() {
        let stems = vec!["Mesh".to_string()];
        let lists = render_lists(Some("Arcane.Mesh"), &stems, false).expect("render");
        assert!(lists.contains("project(Arcane_Mesh LANGUAGES CXX)"));
        assert!(lists.contains("add_library(Arcane_Mesh\n  Mesh.cc\n  Mesh.h\n)"));

        let lists = render_lists(None, &stems, true).expect("render");
        assert!(lists.contains("project(modane_generated LANGUAGES CXX)"));
        assert!(lists.contains("  ${MESH_SOURCES}\n"));
    }
}
