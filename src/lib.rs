// SPDX-License-Identifier: CC0-1.0

//! Modane umbrella crate.
//!
//! This crate primarily serves as the workspace root.
//!
//! All functional code lives in the workspace member crates under
//! `primitives/`, `compiler/` and `cli/`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

/// Miscellaneous metadata about the Modane workspace.
pub mod modane_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
