// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! XML model to intermediate model transformation.
//!
//! The pipeline only depends on the [`ModelTransformer`] boundary. The crate
//! also ships [`ReferenceTransformer`], a deterministic engine that carries
//! over what orchestration needs: the package and one import per referenced
//! XML model.

use std::fmt::Write as _;
use std::rc::Rc;

use model::{ModelFormat, Resource, ResourceKey};
use thiserror::Error;

/// Error type for transformation operations in this crate.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The transformer was handed something other than an XML model.
    #[error("Cannot transform {key}: expected an {} model, got {found}", ModelFormat::Xml)]
    UnexpectedFormat {
        /// Offending resource
        key: ResourceKey,
        /// Its actual format
        found: ModelFormat,
    },
    /// The resource has no usable file stem to name its output after.
    #[error("Cannot derive a model name from {0}")]
    Unnamed(ResourceKey),
    /// Formatting error when building model text.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

/// Convenient result type for transformation functions in this crate.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Options affecting the produced intermediate text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Strip documentation from the produced model
    pub obfuscate: bool,
}

/// One intermediate model produced from one XML model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateModel {
    /// Output file name (`<stem>.m`)
    pub file_name: String,
    /// Declared package
    pub package: String,
    /// Stems of the intermediate models this one imports, in order
    pub imports: Vec<String>,
    /// Model text
    pub text: String,
}

/// Turns an in-scope XML model, given its resolved dependencies, into an intermediate model.
pub trait ModelTransformer {
    /// Transform `model`; `dependencies` are the resident resources it references.
    fn transform(
        &self,
        model: &Resource,
        dependencies: &[Rc<Resource>],
        options: TransformOptions,
    ) -> Result<IntermediateModel>;
}

/// Deterministic reference transformer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceTransformer;

impl ReferenceTransformer {
    /// Create a new ReferenceTransformer
    pub fn new() -> Self { Self }
}

impl ModelTransformer for ReferenceTransformer {
    fn transform(
        &self,
        model: &Resource,
        dependencies: &[Rc<Resource>],
        options: TransformOptions,
    ) -> Result<IntermediateModel> {
        if model.format() != ModelFormat::Xml {
            return Err(TransformError::UnexpectedFormat {
                key: model.key().clone(),
                found: model.format(),
            });
        }
        let stem = model.key().stem();
        if stem.is_empty() {
            return Err(TransformError::Unnamed(model.key().clone()));
        }

        let package = model
            .package()
            .and_then(package_identifier)
            .or_else(|| package_identifier(&stem))
            .ok_or_else(|| TransformError::Unnamed(model.key().clone()))?;
        let imports: Vec<String> = dependencies.iter().map(|dep| dep.key().stem()).collect();
        tracing::debug!("transforming {} into package {}", model.key(), package);

        let mut text = String::new();
        if !options.obfuscate {
            writeln!(text, "// Modane model {package}")?;
            writeln!(text, "// Transformed from {stem}.{}", ModelFormat::Xml.extension())?;
            if let Some(name) = model.package().filter(|name| *name != package) {
                writeln!(text, "// Original model name: {name}")?;
            }
            writeln!(text)?;
        }
        writeln!(text, "package {package};")?;
        if !imports.is_empty() {
            writeln!(text)?;
        }
        for import in &imports {
            writeln!(text, "import \"{import}.{}\";", ModelFormat::Intermediate.extension())?;
        }

        Ok(IntermediateModel {
            file_name: format!("{stem}.{}", ModelFormat::Intermediate.extension()),
            package,
            imports,
            text,
        })
    }
}

/// Dotted identifier derived from a model name.
///
/// Each segment keeps ASCII alphanumerics and `_`, other characters become `_`,
/// and a leading digit is prefixed with `_`. Empty segments are dropped.
pub fn package_identifier(name: &str) -> Option<String> {
    let segments: Vec<String> = name
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut ident: String = segment
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
                .collect();
            if ident.starts_with(|c: char| c.is_ascii_digit()) {
                ident.insert(0, '_');
            }
            ident
        })
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}
