// SPDX-License-Identifier: CC0-1.0

//! Directory gathering and extension helpers.
//!
//! `gather_files` is the only place that walks the filesystem; everything else
//! in this module is a pure function over paths.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Check whether `path` carries exactly the extension `extension` (without dot).
///
/// The comparison is case-sensitive: `model.UML` is not a `uml` file.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}

/// Return the file stem of `path` as an owned string, if it is valid UTF-8.
pub fn file_stem_string(path: &Path) -> Option<String> {
    path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string)
}

/// Make `path` absolute against the current working directory.
///
/// No symlink resolution happens here; see `ResourceKey` for canonical identity.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Recursively collect every regular file under `root` whose extension is `extension`.
///
/// Subdirectories are always traversed. A root or subdirectory that cannot be
/// listed contributes nothing instead of failing the walk. Entries are visited
/// in file-name order inside each directory, so the result is stable for a
/// given filesystem state.
///
/// # Arguments
///
/// * `root` - Directory to walk
/// * `extension` - Extension to keep, without the leading dot (e.g. `"mdzip"`)
///
/// # Returns
///
/// Absolute paths of the matching files, in walk order
pub fn gather_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    let root = absolutize(root);
    let mut files = Vec::new();

    for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    files
}
