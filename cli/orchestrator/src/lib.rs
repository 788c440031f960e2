// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Command-line front end of the headless Modane pipeline.
//!
//! [`execute`] parses directives, validates them, checks the conversion tool
//! when archives are involved and runs the pipeline. Every failure is reported
//! on stdout; the process exit status is always 0.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use config::ToolConfig;
use pipeline::{
    Command, Directives, ExternalToolInvoker, FsProbe, PipelineOrchestrator, PipelineValidator,
    RunReport, StageOrigin,
};

/// Usage text printed after every rejected invocation.
pub const USAGE: &str = "\
Usage: modane-headless <command> [options]

Commands:
  generate-uml          Convert MDZIP archives into EMF UML models
  generate-modane       Produce Modane models from MDZIP archives or EMF UML models
  generate-cpp          Generate C++ from MDZIP archives, EMF UML models or Modane models

Options:
  --mdzip-dir <dir>     Directory searched recursively for .mdzip archives
  --mdzip <a,b,...>     Comma-separated .mdzip archives
  --uml-dir <dir>       EMF UML output directory when converting archives, input directory otherwise
  --uml <a,b,...>       Comma-separated .uml models (generate-modane, generate-cpp)
  --modane-dir <dir>    Modane output directory (generate-modane) or input directory (generate-cpp)
  --modane <a,b,...>    Comma-separated .m models (generate-cpp)
  --write-modane-files  Also write Modane models into --cpp-dir (generate-cpp)
  --obfuscate           Strip documentation from written Modane models
  --cpp-dir <dir>       C++ output directory (generate-cpp)
  --scihook             Generate SciHook instrumentation points (generate-cpp)
  --profacc             Generate accelerator profiling regions (generate-cpp)
  --cmakes              Generate one .cmake fragment per model (generate-cpp)
  --cmakelists          Generate a CMakeLists.txt (generate-cpp)
  --pkg <A.B>           Only generate models of this package (generate-modane, generate-cpp)

Environment:
  EMF2XMI               Full path to the MagicDraw emf2xmi tool, required for .mdzip input
  MODANE_CONFIG         Configuration file (default: <config dir>/modane/config.toml)
  RUST_LOG              Log filter, overrides the configured level";

/// Command-line interface of the headless application.
#[derive(Parser, Debug)]
#[command(name = "modane-headless", about = "Headless Modane pipeline", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// The three pipeline commands; each accepts every option so that misuse is
/// reported by the validator with a precise reason.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert MDZIP archives into EMF UML models
    GenerateUml(PipelineArgs),
    /// Produce Modane models
    GenerateModane(PipelineArgs),
    /// Generate C++
    GenerateCpp(PipelineArgs),
}

#[derive(Args, Debug, Default)]
struct PipelineArgs {
    /// Directory searched recursively for .mdzip archives
    #[arg(long, value_name = "DIR")]
    mdzip_dir: Option<PathBuf>,
    /// Comma-separated .mdzip archives
    #[arg(long, value_name = "FILES", value_delimiter = ',')]
    mdzip: Vec<PathBuf>,
    /// EMF UML output or input directory
    #[arg(long, value_name = "DIR")]
    uml_dir: Option<PathBuf>,
    /// Comma-separated .uml models
    #[arg(long, value_name = "FILES", value_delimiter = ',')]
    uml: Vec<PathBuf>,
    /// Modane output or input directory
    #[arg(long, value_name = "DIR")]
    modane_dir: Option<PathBuf>,
    /// Comma-separated .m models
    #[arg(long, value_name = "FILES", value_delimiter = ',')]
    modane: Vec<PathBuf>,
    /// Also write Modane models when generating C++
    #[arg(long)]
    write_modane_files: bool,
    /// Strip documentation from written Modane models
    #[arg(long)]
    obfuscate: bool,
    /// C++ output directory
    #[arg(long, value_name = "DIR")]
    cpp_dir: Option<PathBuf>,
    /// SciHook instrumentation
    #[arg(long)]
    scihook: bool,
    /// Accelerator profiling regions
    #[arg(long)]
    profacc: bool,
    /// One .cmake fragment per model
    #[arg(long)]
    cmakes: bool,
    /// Top-level CMakeLists.txt
    #[arg(long)]
    cmakelists: bool,
    /// Package filter
    #[arg(long, value_name = "A.B")]
    pkg: Option<String>,
}

impl From<PipelineArgs> for Directives {
    fn from(args: PipelineArgs) -> Self {
        Directives {
            mdzip_dir: args.mdzip_dir,
            mdzip: args.mdzip,
            uml_dir: args.uml_dir,
            uml: args.uml,
            modane_dir: args.modane_dir,
            modane: args.modane,
            write_modane_files: args.write_modane_files,
            obfuscate: args.obfuscate,
            cpp_dir: args.cpp_dir,
            scihook: args.scihook,
            profacc: args.profacc,
            cmakes: args.cmakes,
            cmakelists: args.cmakelists,
            pkg: args.pkg,
        }
    }
}

impl Cli {
    /// Split into the selected command and its directives.
    fn into_parts(self) -> (Command, Directives) {
        match self.command {
            Commands::GenerateUml(args) => (Command::GenerateUml, args.into()),
            Commands::GenerateModane(args) => (Command::GenerateModane, args.into()),
            Commands::GenerateCpp(args) => (Command::GenerateCpp, args.into()),
        }
    }
}

/// How an invocation ended. The process exits with status 0 in every case.
#[derive(Debug)]
pub enum Outcome {
    /// Help or version was requested
    Informational,
    /// The command line was rejected before anything ran
    Rejected,
    /// The environment is not set up for the plan
    ConfigurationError,
    /// A stage failed
    Failed,
    /// Every stage succeeded
    Completed(RunReport),
}

/// Parse `args` (program name first) and run the resulting plan.
pub fn execute<I, T>(args: I) -> Outcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{}", err);
            return Outcome::Informational;
        }
        Err(err) => {
            let rendered = err.render().to_string();
            println!("{}", rendered.lines().next().unwrap_or_default());
            println!("{USAGE}");
            return Outcome::Rejected;
        }
    };

    let (command, directives) = cli.into_parts();
    let plan = match PipelineValidator::new(&FsProbe).validate(command, &directives) {
        Ok(plan) => plan,
        Err(e) => {
            println!("Error: {e}");
            println!("{USAGE}");
            return Outcome::Rejected;
        }
    };
    for warning in plan.warnings() {
        println!("Warning: {warning}");
    }

    let needs_converter = plan.origin() == StageOrigin::FromArchive;
    let mut orchestrator = PipelineOrchestrator::new(plan);
    if needs_converter {
        match ToolConfig::from_env() {
            Ok(tool) => {
                orchestrator = orchestrator.with_converter(ExternalToolInvoker::new(tool.tool_path))
            }
            Err(e) => {
                println!("{e}");
                return Outcome::ConfigurationError;
            }
        }
    }

    match orchestrator.run() {
        Ok(report) => Outcome::Completed(report),
        Err(e) => {
            println!("{e}");
            Outcome::Failed
        }
    }
}
