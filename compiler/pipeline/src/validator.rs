//! Directive validation.
//!
//! Which options a command accepts is a fixed table ([`forbidden_flags`],
//! [`required_output`]); which stage a run starts from depends on which inputs
//! actually resolve on disk, so the validator consults a [`PathProbe`] but
//! never creates anything.

use std::path::{Path, PathBuf};

use model::ModelFormat;
use thiserror::Error;

use crate::directives::{Directives, Flag};
use crate::inputs::{PathProbe, StageInputResolver};
use crate::{Command, FeatureFlags, FileSet, OutputDirs, PipelinePlan, StageOrigin};

/// Why a set of directives cannot be run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The option is never valid with this command.
    #[error("{flag} cannot be used with {command}")]
    ForbiddenOption {
        /// Command being validated
        command: Command,
        /// Offending option
        flag: Flag,
    },
    /// The command's output directory was not given.
    #[error("{command} requires {flag}")]
    MissingOutput {
        /// Command being validated
        command: Command,
        /// Missing output option
        flag: Flag,
    },
    /// An output directory path names something that is not a directory.
    #[error("{flag} {} exists and is not a directory", .path.display())]
    OutputNotDirectory {
        /// Output option
        flag: Flag,
        /// Given path
        path: PathBuf,
    },
    /// The option only makes sense together with another one.
    #[error("{flag} requires {required}")]
    RequiresOption {
        /// Given option
        flag: Flag,
        /// Option it depends on
        required: Flag,
    },
    /// The option applies to XML models being transformed, not to existing intermediate models.
    #[error("{flag} cannot be used when generating from existing Modane models")]
    NotWithIntermediateOrigin {
        /// Offending option
        flag: Flag,
    },
    /// No input source resolves.
    #[error("{command} needs an input: {expected}{}", detail_suffix(.details))]
    MissingSource {
        /// Command being validated
        command: Command,
        /// Accepted input options
        expected: &'static str,
        /// Why the given inputs were rejected
        details: Vec<String>,
    },
    /// More than one input source resolves.
    #[error("{command} needs exactly one input source, got {}", .sources.join(" and "))]
    AmbiguousSource {
        /// Command being validated
        command: Command,
        /// Sources that resolved
        sources: Vec<&'static str>,
    },
    /// The package filter is not a dotted name.
    #[error("Invalid package name '{0}' for --pkg")]
    InvalidPackage(String),
}

fn detail_suffix(details: &[String]) -> String {
    if details.is_empty() {
        String::new()
    } else {
        format!(" ({})", details.join("; "))
    }
}

/// Options a command never accepts.
pub fn forbidden_flags(command: Command) -> &'static [Flag] {
    match command {
        Command::GenerateUml => &[
            Flag::Uml,
            Flag::ModaneDir,
            Flag::Modane,
            Flag::WriteModaneFiles,
            Flag::Obfuscate,
            Flag::CppDir,
            Flag::Scihook,
            Flag::Profacc,
            Flag::Cmakes,
            Flag::Cmakelists,
            Flag::Pkg,
        ],
        Command::GenerateModane => &[
            Flag::Modane,
            Flag::WriteModaneFiles,
            Flag::CppDir,
            Flag::Scihook,
            Flag::Profacc,
            Flag::Cmakes,
            Flag::Cmakelists,
        ],
        Command::GenerateCpp => &[],
    }
}

/// Output directory a command always writes to.
pub fn required_output(command: Command) -> Flag {
    match command {
        Command::GenerateUml => Flag::UmlDir,
        Command::GenerateModane => Flag::ModaneDir,
        Command::GenerateCpp => Flag::CppDir,
    }
}

/// Checks directives against the option table and resolves the run's inputs.
pub struct PipelineValidator<'a> {
    probe: &'a dyn PathProbe,
}

impl<'a> PipelineValidator<'a> {
    /// Create a validator over `probe`.
    pub fn new(probe: &'a dyn PathProbe) -> Self { Self { probe } }

    /// Validate `directives` for `command`.
    ///
    /// # Returns
    /// The plan to execute, or the first rule the directives violate
    pub fn validate(
        &self,
        command: Command,
        directives: &Directives,
    ) -> Result<PipelinePlan, ValidationError> {
        let forbidden = forbidden_flags(command);
        if let Some(flag) = directives.present().into_iter().find(|flag| forbidden.contains(flag)) {
            return Err(ValidationError::ForbiddenOption { command, flag });
        }

        let output_flag = required_output(command);
        let output = match command {
            Command::GenerateUml => directives.uml_dir.as_deref(),
            Command::GenerateModane => directives.modane_dir.as_deref(),
            Command::GenerateCpp => directives.cpp_dir.as_deref(),
        }
        .ok_or(ValidationError::MissingOutput { command, flag: output_flag })?;
        self.check_output(output_flag, output)?;

        if let Some(package) = &directives.pkg {
            if !is_package_name(package) {
                return Err(ValidationError::InvalidPackage(package.clone()));
            }
        }

        let mut warnings = Vec::new();
        let (origin, inputs) = self.resolve_origin(command, directives, &mut warnings)?;

        if origin == StageOrigin::FromArchive && command != Command::GenerateUml {
            if let Some(uml_dir) = directives.uml_dir.as_deref() {
                self.check_output(Flag::UmlDir, uml_dir)?;
            }
        }
        if command == Command::GenerateCpp {
            if origin == StageOrigin::FromIntermediateModel {
                for (given, flag) in [
                    (directives.write_modane_files, Flag::WriteModaneFiles),
                    (directives.obfuscate, Flag::Obfuscate),
                ] {
                    if given {
                        return Err(ValidationError::NotWithIntermediateOrigin { flag });
                    }
                }
            }
            if directives.obfuscate && !directives.write_modane_files {
                return Err(ValidationError::RequiresOption {
                    flag: Flag::Obfuscate,
                    required: Flag::WriteModaneFiles,
                });
            }
        }

        let absolute = |dir: Option<&PathBuf>| dir.map(|dir| path::absolutize(dir));
        let outputs = OutputDirs {
            uml_dir: if origin == StageOrigin::FromArchive {
                absolute(directives.uml_dir.as_ref())
            } else {
                None
            },
            modane_dir: if command == Command::GenerateModane {
                absolute(directives.modane_dir.as_ref())
            } else {
                None
            },
            cpp_dir: if command == Command::GenerateCpp {
                absolute(directives.cpp_dir.as_ref())
            } else {
                None
            },
        };
        let flags = FeatureFlags {
            write_modane_files: directives.write_modane_files,
            obfuscate: directives.obfuscate,
            scihook: directives.scihook,
            profacc: directives.profacc,
            cmakes: directives.cmakes,
            cmakelists: directives.cmakelists,
        };

        tracing::debug!("validated {} starting from {:?}", command, origin);
        Ok(PipelinePlan::new(command, origin, inputs, outputs, directives.pkg.clone(), flags)
            .with_warnings(warnings))
    }

    fn check_output(&self, flag: Flag, dir: &Path) -> Result<(), ValidationError> {
        if self.probe.exists(dir) && !self.probe.is_dir(dir) {
            return Err(ValidationError::OutputNotDirectory { flag, path: dir.to_path_buf() });
        }
        Ok(())
    }

    /// Exactly one of the archive, XML and intermediate sources must resolve.
    fn resolve_origin(
        &self,
        command: Command,
        directives: &Directives,
        warnings: &mut Vec<String>,
    ) -> Result<(StageOrigin, FileSet), ValidationError> {
        let resolver = StageInputResolver::new(self.probe);
        let mut details = Vec::new();

        let archive = if directives.mdzip_dir.is_some() || !directives.mdzip.is_empty() {
            resolver.resolve_either(
                directives.mdzip_dir.as_deref(),
                &directives.mdzip,
                ModelFormat::Archive,
                &mut details,
            )
        } else {
            None
        };

        if command == Command::GenerateUml {
            warnings.append(&mut details);
            return match archive {
                Some(set) => Ok((StageOrigin::FromArchive, self.note_empty(set, warnings))),
                None => Err(ValidationError::MissingSource {
                    command,
                    expected: "--mdzip-dir or --mdzip",
                    details: warnings.clone(),
                }),
            };
        }

        let mut sources: Vec<(StageOrigin, &'static str, FileSet)> = Vec::new();
        match archive {
            Some(set) if directives.uml_dir.is_some() => {
                sources.push((StageOrigin::FromArchive, "MDZIP archives", set))
            }
            Some(_) => details.push(format!(
                "MDZIP archives are ignored without {} to convert them into",
                Flag::UmlDir
            )),
            None => {}
        }

        let archive_given = sources.iter().any(|(origin, _, _)| *origin == StageOrigin::FromArchive);
        let xml = if archive_given {
            if directives.uml.is_empty() {
                None
            } else {
                resolver.resolve_list(&directives.uml, ModelFormat::Xml, &mut details)
            }
        } else if directives.uml_dir.is_some() || !directives.uml.is_empty() {
            resolver.resolve_either(
                directives.uml_dir.as_deref(),
                &directives.uml,
                ModelFormat::Xml,
                &mut details,
            )
        } else {
            None
        };
        if let Some(set) = xml {
            sources.push((StageOrigin::FromXmlModel, "EMF UML models", set));
        }

        if command == Command::GenerateCpp
            && (directives.modane_dir.is_some() || !directives.modane.is_empty())
        {
            if let Some(set) = resolver.resolve_either(
                directives.modane_dir.as_deref(),
                &directives.modane,
                ModelFormat::Intermediate,
                &mut details,
            ) {
                sources.push((StageOrigin::FromIntermediateModel, "Modane models", set));
            }
        }

        warnings.append(&mut details);
        match sources.len() {
            0 => Err(ValidationError::MissingSource {
                command,
                expected: match command {
                    Command::GenerateCpp => {
                        "--mdzip-dir/--mdzip with --uml-dir, --uml-dir/--uml, or --modane-dir/--modane"
                    }
                    _ => "--mdzip-dir/--mdzip with --uml-dir, or --uml-dir/--uml",
                },
                details: warnings.clone(),
            }),
            1 => {
                let (origin, _, set) = sources.remove(0);
                Ok((origin, self.note_empty(set, warnings)))
            }
            _ => Err(ValidationError::AmbiguousSource {
                command,
                sources: sources.iter().map(|(_, label, _)| *label).collect(),
            }),
        }
    }

    fn note_empty(&self, set: FileSet, warnings: &mut Vec<String>) -> FileSet {
        if set.is_empty() {
            warnings.push(format!("no .{} file found", set.format().extension()));
        }
        set
    }
}

/// `A`, `A.B`, `A.B.C`: non-empty segments of ASCII alphanumerics and `_`.
fn is_package_name(package: &str) -> bool {
    package.split('.').all(|segment| {
        !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}
