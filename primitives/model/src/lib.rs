// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Model resources shared by every pipeline stage.
//!
//! A *resource* is one model file (XML model or intermediate model) loaded into
//! memory together with the canonical keys of the files it references. Loading
//! always goes through a [`ResourceIdentityCache`], so a file referenced from
//! several roots is parsed once and every root sees the same `Rc<Resource>`.
//!
//! ## Module Organization
//!
//! - `format` - The three model formats and their file extensions
//! - `resource` - `ResourceKey` and `Resource`
//! - `cache` - The per-run identity cache
//! - `loader` - Cache-aware recursive loading over a `ResourceParser`
//! - `parsers` - Reference scanners for XML and intermediate models

use std::path::PathBuf;

use thiserror::Error;

pub mod cache;
pub mod format;
pub mod loader;
pub mod parsers;
pub mod resource;

pub use cache::ResourceIdentityCache;
pub use format::ModelFormat;
pub use loader::{ParsedResource, ResourceLoader, ResourceParser};
pub use parsers::{IntermediateModelParser, XmlModelParser};
pub use resource::{Resource, ResourceKey};

/// Errors raised while resolving, reading or parsing model resources.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The path could not be turned into a canonical key (usually: it does not exist).
    #[error("Failed to resolve model path {}: {}", .path.display(), .source)]
    Canonicalize {
        /// Path that was being resolved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The model file exists but could not be read.
    #[error("Failed to read model {}: {}", .path.display(), .source)]
    Read {
        /// Path of the unreadable file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The model text is malformed.
    #[error("Syntax error in {}: {}", .path.display(), .message)]
    Syntax {
        /// Path of the malformed file
        path: PathBuf,
        /// Parser message
        message: String,
    },
    /// A cross-file reference names a file that does not exist.
    #[error("Unresolved reference '{reference}' in {from}")]
    UnresolvedReference {
        /// Resource containing the reference
        from: ResourceKey,
        /// Reference text as written in the model
        reference: String,
    },
    /// A second resource was offered to the cache under an existing key.
    #[error("Resource {0} is already loaded")]
    DuplicateResource(ResourceKey),
}

/// Result alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
