// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Headless Modane pipeline: archive → XML model → intermediate model → C++.
//!
//! Directives are first validated into an immutable [`PipelinePlan`], which a
//! [`PipelineOrchestrator`] then executes stage by stage.
//!
//! ## Module Organization
//!
//! - `directives` - Raw command-line options
//! - `plan` - Commands, stage origins, file sets and the plan itself
//! - `inputs` - Directory and list expansion into file sets
//! - `validator` - The option decision table
//! - `converter` - The external archive conversion tool
//! - `scope` - Which loaded models are emitted
//! - `orchestration` - Stage sequencing

use std::path::PathBuf;

use thiserror::Error;

pub mod converter;
pub mod directives;
pub mod inputs;
pub mod orchestration;
pub mod plan;
pub mod scope;
pub mod validator;

pub use converter::{ArchiveConverter, ExternalToolInvoker};
pub use directives::{Directives, Flag};
pub use inputs::{FsProbe, PathProbe, StageInputResolver};
pub use orchestration::{PipelineOrchestrator, RunReport};
pub use plan::{Command, FeatureFlags, FileSet, OutputDirs, PipelinePlan, StageOrigin};
pub use scope::GenerationScope;
pub use validator::{PipelineValidator, ValidationError};

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The conversion tool reported failure for an archive.
    #[error("UML generation failed for {} (exit code {exit_code})", .archive.display())]
    ConversionFailed {
        /// Archive being converted
        archive: PathBuf,
        /// Tool exit code, `-1` when killed by a signal
        exit_code: i32,
    },
    /// The conversion tool could not be started.
    #[error("Failed to run {}: {source}", .tool.display())]
    Spawn {
        /// Tool path
        tool: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Two in-scope models would produce output files with the same name.
    #[error("{} and {} would both be generated as {stem}", .first.display(), .second.display())]
    OutputNameCollision {
        /// Shared file stem
        stem: String,
        /// First model in scope order
        first: PathBuf,
        /// Model clashing with `first`
        second: PathBuf,
    },
    /// The plan starts from archives but no converter was configured.
    #[error("No archive converter configured")]
    MissingConverter,
    /// The plan lacks an output directory its stages need.
    #[error("Plan has no {0} output directory")]
    MissingOutputDir(&'static str),
    /// Error loading a model.
    #[error(transparent)]
    Model(#[from] model::ModelError),
    /// Error propagated from the transformation engine.
    #[error(transparent)]
    Transform(#[from] transform::TransformError),
    /// Error propagated from the codegen crate.
    #[error(transparent)]
    Codegen(#[from] codegen::CodegenError),
    /// I/O error while creating or writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
