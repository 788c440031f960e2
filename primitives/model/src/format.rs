//! Model formats handled by the pipeline.
//!
//! Each stage consumes one format and produces the next one:
//! archive (`.mdzip`) → XML model (`.uml`) → intermediate model (`.m`).

use std::fmt;

/// The three on-disk model formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    /// Proprietary binary project archive, converted by an external tool
    Archive,
    /// EMF UML XML model
    Xml,
    /// Modane intermediate model
    Intermediate,
}

impl ModelFormat {
    /// File extension (without dot) carried by files of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ModelFormat::Archive => "mdzip",
            ModelFormat::Xml => "uml",
            ModelFormat::Intermediate => "m",
        }
    }

    /// Human-readable name used in console messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelFormat::Archive => "MDZIP",
            ModelFormat::Xml => "EMF UML",
            ModelFormat::Intermediate => "Modane",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.display_name()) }
}
