//! The immutable description of one pipeline run.

use std::fmt;
use std::path::{Path, PathBuf};

use codegen::CodegenFlags;
use model::ModelFormat;

/// Top-level action, selected by the first directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Archive → XML model
    GenerateUml,
    /// (Archive →) XML model → intermediate model
    GenerateModane,
    /// (Archive → XML model →) intermediate model → C++
    GenerateCpp,
}

impl Command {
    /// All commands, in pipeline order.
    pub const ALL: [Command; 3] = [Command::GenerateUml, Command::GenerateModane, Command::GenerateCpp];

    /// Directive spelling.
    pub fn name(&self) -> &'static str {
        match self {
            Command::GenerateUml => "generate-uml",
            Command::GenerateModane => "generate-modane",
            Command::GenerateCpp => "generate-cpp",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Input format a run starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageOrigin {
    /// `.mdzip` archives, converted by the external tool
    FromArchive,
    /// `.uml` XML models
    FromXmlModel,
    /// `.m` intermediate models
    FromIntermediateModel,
}

impl StageOrigin {
    /// Format of the plan's input files.
    pub fn format(&self) -> ModelFormat {
        match self {
            StageOrigin::FromArchive => ModelFormat::Archive,
            StageOrigin::FromXmlModel => ModelFormat::Xml,
            StageOrigin::FromIntermediateModel => ModelFormat::Intermediate,
        }
    }
}

/// Ordered absolute input paths sharing one extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    format: ModelFormat,
    files: Vec<PathBuf>,
    from_directory: bool,
}

impl FileSet {
    /// Files gathered by walking a directory.
    pub fn from_directory(format: ModelFormat, files: Vec<PathBuf>) -> Self {
        Self { format, files, from_directory: true }
    }

    /// Files named one by one.
    pub fn from_list(format: ModelFormat, files: Vec<PathBuf>) -> Self {
        Self { format, files, from_directory: false }
    }

    /// Format shared by every file.
    pub fn format(&self) -> ModelFormat { self.format }

    /// The files, in order.
    pub fn files(&self) -> &[PathBuf] { &self.files }

    /// Whether the set came from a directory ("generate all").
    pub fn is_from_directory(&self) -> bool { self.from_directory }

    /// Number of files.
    pub fn len(&self) -> usize { self.files.len() }

    /// Whether the set holds no file.
    pub fn is_empty(&self) -> bool { self.files.is_empty() }
}

/// Boolean switches of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Also write intermediate models when generating C++
    pub write_modane_files: bool,
    /// Strip documentation from written intermediate models
    pub obfuscate: bool,
    /// SciHook instrumentation
    pub scihook: bool,
    /// Accelerator profiling
    pub profacc: bool,
    /// Per-model CMake fragments
    pub cmakes: bool,
    /// Top-level `CMakeLists.txt`
    pub cmakelists: bool,
}

impl FeatureFlags {
    /// The subset the C++ generator sees.
    pub fn codegen(&self) -> CodegenFlags {
        CodegenFlags {
            scihook: self.scihook,
            profacc: self.profacc,
            cmakes: self.cmakes,
            cmakelists: self.cmakelists,
        }
    }
}

/// Output directories of a run; only the ones the plan needs are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputDirs {
    /// Where converted XML models go
    pub uml_dir: Option<PathBuf>,
    /// Where intermediate models go for `generate-modane`
    pub modane_dir: Option<PathBuf>,
    /// Where generated C++ goes
    pub cpp_dir: Option<PathBuf>,
}

/// Validated, immutable plan consumed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePlan {
    command: Command,
    origin: StageOrigin,
    inputs: FileSet,
    outputs: OutputDirs,
    package: Option<String>,
    flags: FeatureFlags,
    warnings: Vec<String>,
}

impl PipelinePlan {
    /// Assemble a plan. Only the validator should need this.
    pub fn new(
        command: Command,
        origin: StageOrigin,
        inputs: FileSet,
        outputs: OutputDirs,
        package: Option<String>,
        flags: FeatureFlags,
    ) -> Self {
        Self { command, origin, inputs, outputs, package, flags, warnings: Vec::new() }
    }

    /// Attach input warnings collected during validation.
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Command being run.
    pub fn command(&self) -> Command { self.command }

    /// Input format the run starts from.
    pub fn origin(&self) -> StageOrigin { self.origin }

    /// Resolved input files.
    pub fn inputs(&self) -> &FileSet { &self.inputs }

    /// `--uml-dir`, when the plan writes XML models.
    pub fn uml_dir(&self) -> Option<&Path> { self.outputs.uml_dir.as_deref() }

    /// `--modane-dir`, when the plan writes intermediate models for `generate-modane`.
    pub fn modane_dir(&self) -> Option<&Path> { self.outputs.modane_dir.as_deref() }

    /// `--cpp-dir`, when the plan generates C++.
    pub fn cpp_dir(&self) -> Option<&Path> { self.outputs.cpp_dir.as_deref() }

    /// Package filter.
    pub fn package(&self) -> Option<&str> { self.package.as_deref() }

    /// Feature switches.
    pub fn flags(&self) -> FeatureFlags { self.flags }

    /// Input entries that were dropped, one message each.
    pub fn warnings(&self) -> &[String] { &self.warnings }
}
