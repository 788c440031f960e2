// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Path utility functions for gathering model files and inspecting extensions.
//!
//! This crate provides the directory walk used to expand `--*-dir` inputs into
//! concrete file lists, plus the small helpers every stage uses to check file
//! extensions and derive per-file output names.

pub mod path_utils;

// Re-export for convenience
pub use path_utils::*;
