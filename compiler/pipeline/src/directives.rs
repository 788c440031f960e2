//! Raw command-line directives, before validation.

use std::fmt;
use std::path::PathBuf;

/// Every option the headless application understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `--mdzip-dir`
    MdzipDir,
    /// `--mdzip`
    Mdzip,
    /// `--uml-dir`
    UmlDir,
    /// `--uml`
    Uml,
    /// `--modane-dir`
    ModaneDir,
    /// `--modane`
    Modane,
    /// `--write-modane-files`
    WriteModaneFiles,
    /// `--obfuscate`
    Obfuscate,
    /// `--cpp-dir`
    CppDir,
    /// `--scihook`
    Scihook,
    /// `--profacc`
    Profacc,
    /// `--cmakes`
    Cmakes,
    /// `--cmakelists`
    Cmakelists,
    /// `--pkg`
    Pkg,
}

impl Flag {
    /// Command-line spelling.
    pub fn name(&self) -> &'static str {
        match self {
            Flag::MdzipDir => "--mdzip-dir",
            Flag::Mdzip => "--mdzip",
            Flag::UmlDir => "--uml-dir",
            Flag::Uml => "--uml",
            Flag::ModaneDir => "--modane-dir",
            Flag::Modane => "--modane",
            Flag::WriteModaneFiles => "--write-modane-files",
            Flag::Obfuscate => "--obfuscate",
            Flag::CppDir => "--cpp-dir",
            Flag::Scihook => "--scihook",
            Flag::Profacc => "--profacc",
            Flag::Cmakes => "--cmakes",
            Flag::Cmakelists => "--cmakelists",
            Flag::Pkg => "--pkg",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Options as given on the command line. Empty lists mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Directory of archives
    pub mdzip_dir: Option<PathBuf>,
    /// Explicit archives
    pub mdzip: Vec<PathBuf>,
    /// XML model directory (output or source)
    pub uml_dir: Option<PathBuf>,
    /// Explicit XML models
    pub uml: Vec<PathBuf>,
    /// Intermediate model directory (output or source)
    pub modane_dir: Option<PathBuf>,
    /// Explicit intermediate models
    pub modane: Vec<PathBuf>,
    /// Write intermediate models during C++ generation
    pub write_modane_files: bool,
    /// Strip documentation from intermediate models
    pub obfuscate: bool,
    /// C++ output directory
    pub cpp_dir: Option<PathBuf>,
    /// SciHook instrumentation
    pub scihook: bool,
    /// Accelerator profiling
    pub profacc: bool,
    /// Per-model CMake fragments
    pub cmakes: bool,
    /// Top-level `CMakeLists.txt`
    pub cmakelists: bool,
    /// Package filter
    pub pkg: Option<String>,
}

impl Directives {
    /// Options present, in declaration order.
    pub fn present(&self) -> Vec<Flag> {
        let checks = [
            (Flag::MdzipDir, self.mdzip_dir.is_some()),
            (Flag::Mdzip, !self.mdzip.is_empty()),
            (Flag::UmlDir, self.uml_dir.is_some()),
            (Flag::Uml, !self.uml.is_empty()),
            (Flag::ModaneDir, self.modane_dir.is_some()),
            (Flag::Modane, !self.modane.is_empty()),
            (Flag::WriteModaneFiles, self.write_modane_files),
            (Flag::Obfuscate, self.obfuscate),
            (Flag::CppDir, self.cpp_dir.is_some()),
            (Flag::Scihook, self.scihook),
            (Flag::Profacc, self.profacc),
            (Flag::Cmakes, self.cmakes),
            (Flag::Cmakelists, self.cmakelists),
            (Flag::Pkg, self.pkg.is_some()),
        ];
        checks.into_iter().filter_map(|(flag, given)| given.then_some(flag)).collect()
    }
}
