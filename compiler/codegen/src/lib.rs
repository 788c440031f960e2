// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! C++ code generation from intermediate models.
//!
//! This crate turns in-scope intermediate resources into C++ sources and build
//! scaffolding. It focuses solely on code generation: choosing which resources
//! are in scope, loading them and creating output directories reside in the
//! pipeline crate.

pub mod generators;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use model::Resource;
use thiserror::Error;

pub use generators::CppGenerator;

/// Error type for code generation operations in this crate.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Underlying I/O error while writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Formatting error when building generated source.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
    /// Two generated files would land on the same path.
    #[error("Generated file {0} would be written twice")]
    DuplicateOutput(String),
    /// A resource name cannot be turned into a C++ identifier.
    #[error("Cannot derive a C++ name from {0}")]
    InvalidName(String),
}

/// Convenient result type for codegen functions in this crate.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Generation switches taken from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodegenFlags {
    /// Add SciHook instrumentation entry points
    pub scihook: bool,
    /// Add accelerator profiling regions
    pub profacc: bool,
    /// Write one `<stem>.cmake` fragment per model
    pub cmakes: bool,
    /// Write a top-level `CMakeLists.txt`
    pub cmakelists: bool,
}

/// Everything a generator needs for one run.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    /// In-scope intermediate resources, in scope order
    pub resources: &'a [Rc<Resource>],
    /// Package filter the scope was narrowed with, if any
    pub package: Option<&'a str>,
    /// Feature switches
    pub flags: CodegenFlags,
}

/// Defines the interface for turning intermediate resources into generated files.
///
/// Implementors produce `(relative file name, contents)` pairs; writing them is
/// left to [`write_generated`].
pub trait CodeGenerator {
    /// Generate files for the request.
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<Vec<(String, String)>>;
}

/// Trim trailing whitespace from each line and drop trailing blank lines.
/// Always ensures the returned string ends with a single newline when not empty.
fn clean_generated_source(src: &str) -> String {
    let mut lines: Vec<&str> = src.lines().map(str::trim_end).collect();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

/// Persist generated files under `out_dir`, creating any necessary subdirectories.
///
/// # Returns
/// The written paths, in the order of `files`.
pub fn write_generated<P: AsRef<Path>>(
    out_dir: P,
    files: &[(String, String)],
) -> Result<Vec<PathBuf>> {
    let mut names = HashSet::with_capacity(files.len());
    if let Some((name, _)) = files.iter().find(|(name, _)| !names.insert(name.as_str())) {
        return Err(CodegenError::DuplicateOutput(name.clone()));
    }

    fs::create_dir_all(&out_dir)?;
    let mut written: Vec<PathBuf> = Vec::with_capacity(files.len());
    for (name, src) in files {
        let path = out_dir.as_ref().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, clean_generated_source(src).as_bytes())?;
        tracing::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
