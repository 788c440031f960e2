//! Archive conversion through the external tool.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{PipelineError, Result};

/// Something that turns one `.mdzip` archive into XML models under a destination directory.
pub trait ArchiveConverter {
    /// Convert `archive` into `destination`.
    ///
    /// # Returns
    /// The process exit code; `0` means success
    fn convert(&self, archive: &Path, destination: &Path) -> Result<i32>;
}

/// Runs the conversion tool as a blocking subprocess.
///
/// The tool is invoked as
/// `<tool> project_file=<archive> destination_dir=<destination>` with the
/// caller's stdout and stderr.
#[derive(Debug, Clone)]
pub struct ExternalToolInvoker {
    tool: PathBuf,
}

impl ExternalToolInvoker {
    /// Create an invoker for the executable at `tool`.
    pub fn new(tool: impl Into<PathBuf>) -> Self { Self { tool: tool.into() } }

    /// Path of the executable.
    pub fn tool(&self) -> &Path { &self.tool }
}

impl ArchiveConverter for ExternalToolInvoker {
    fn convert(&self, archive: &Path, destination: &Path) -> Result<i32> {
        fs::create_dir_all(destination)?;

        let project_file = format!("project_file={}", archive.display());
        let destination_dir = format!("destination_dir={}", destination.display());
        logging::trace(
            "converter",
            &format!("→ {} {} {}", self.tool.display(), project_file, destination_dir),
        );

        let status = Command::new(&self.tool)
            .arg(&project_file)
            .arg(&destination_dir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| PipelineError::Spawn { tool: self.tool.clone(), source })?;

        // No exit code means the process was killed by a signal.
        let code = status.code().unwrap_or(-1);
        tracing::debug!("{} exited with {}", self.tool.display(), code);
        Ok(code)
    }
}
