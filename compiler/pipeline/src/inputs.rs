//! Turning input directives into concrete file sets.

use std::path::{Path, PathBuf};

use model::ModelFormat;

use crate::FileSet;

/// Filesystem queries the validator is allowed to make.
pub trait PathProbe {
    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Recursive listing of files under `root` with `extension`.
    fn gather(&self, root: &Path, extension: &str) -> Vec<PathBuf>;
}

/// [`PathProbe`] over the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn is_dir(&self, path: &Path) -> bool { path.is_dir() }

    fn is_file(&self, path: &Path) -> bool { path.is_file() }

    fn exists(&self, path: &Path) -> bool { path.exists() }

    fn gather(&self, root: &Path, extension: &str) -> Vec<PathBuf> {
        path::gather_files(root, extension)
    }
}

/// Expands directory and list directives into [`FileSet`]s.
pub struct StageInputResolver<'a> {
    probe: &'a dyn PathProbe,
}

impl<'a> StageInputResolver<'a> {
    /// Create a resolver over `probe`.
    pub fn new(probe: &'a dyn PathProbe) -> Self { Self { probe } }

    /// Every `format` file under `dir`, or `None` when `dir` is not a directory.
    pub fn resolve_dir(&self, dir: &Path, format: ModelFormat) -> Option<FileSet> {
        if !self.probe.is_dir(dir) {
            return None;
        }
        let root = path::absolutize(dir);
        Some(FileSet::from_directory(format, self.probe.gather(&root, format.extension())))
    }

    /// The valid entries of `list`.
    ///
    /// Every entry that is not an existing regular file with the extension of
    /// `format` is dropped with a message in `warnings`. Repeated entries are
    /// kept once. The list is usable when at least one entry survives.
    ///
    /// # Returns
    /// `None` when the list is empty or no entry is valid
    pub fn resolve_list(
        &self,
        list: &[PathBuf],
        format: ModelFormat,
        warnings: &mut Vec<String>,
    ) -> Option<FileSet> {
        let mut files: Vec<PathBuf> = Vec::with_capacity(list.len());
        for entry in list {
            let absolute = path::absolutize(entry);
            if !self.probe.is_file(&absolute) {
                warnings.push(format!("{} does not exist or is not a file", entry.display()));
            } else if !path::has_extension(&absolute, format.extension()) {
                warnings.push(format!(
                    "{} is not a .{} {} file",
                    entry.display(),
                    format.extension(),
                    format
                ));
            } else if !files.contains(&absolute) {
                files.push(absolute);
            }
        }

        if files.is_empty() {
            None
        } else {
            Some(FileSet::from_list(format, files))
        }
    }

    /// The directory when it resolves, else the list.
    pub fn resolve_either(
        &self,
        dir: Option<&Path>,
        list: &[PathBuf],
        format: ModelFormat,
        warnings: &mut Vec<String>,
    ) -> Option<FileSet> {
        if let Some(dir) = dir {
            if let Some(set) = self.resolve_dir(dir, format) {
                return Some(set);
            }
            warnings.push(format!("{} is not a directory", dir.display()));
        }
        self.resolve_list(list, format, warnings)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(path, "").expect("Failed to create file");
    }

    #[test]
    fn test_directory_expansion_equals_explicit_listing() {
        let temp = tempfile::tempdir().expect("Failed to create temporary directory");
        let root = temp.path();
        touch(&root.join("b/Solver.mdzip"));
        touch(&root.join("a/Mesh.mdzip"));
        touch(&root.join("a/notes.txt"));
        touch(&root.join("Top.mdzip"));

        let resolver = StageInputResolver::new(&FsProbe);
        let from_dir = resolver.resolve_dir(root, ModelFormat::Archive).expect("dir resolves");
        assert!(from_dir.is_from_directory());
        assert_eq!(from_dir.len(), 3);

        let mut warnings = Vec::new();
        let from_list = resolver
            .resolve_list(from_dir.files(), ModelFormat::Archive, &mut warnings)
            .expect("list resolves");
        assert!(warnings.is_empty());
        assert!(!from_list.is_from_directory());
        assert_eq!(from_list.files(), from_dir.files());
    }

    #[test]
    fn test_list_keeps_valid_entries_and_warns_about_the_rest() {
        let temp = tempfile::tempdir().expect("Failed to create temporary directory");
        let good = temp.path().join("Mesh.uml");
        let wrong_ext = temp.path().join("Mesh.UML");
        touch(&good);
        touch(&wrong_ext);
        let list = vec![
            good.clone(),
            temp.path().join("missing.uml"),
            wrong_ext,
            temp.path().to_path_buf(),
            good.clone(),
        ];

        let mut warnings = Vec::new();
        let set = StageInputResolver::new(&FsProbe)
            .resolve_list(&list, ModelFormat::Xml, &mut warnings)
            .expect("one valid entry is enough");

        assert_eq!(set.files(), &[good]);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[1].contains("is not a .uml"));
    }

    #[test]
    fn test_unusable_inputs() {
        let temp = tempfile::tempdir().expect("Failed to create temporary directory");
        let resolver = StageInputResolver::new(&FsProbe);
        let mut warnings = Vec::new();

        assert!(resolver.resolve_list(&[], ModelFormat::Xml, &mut warnings).is_none());
        assert!(resolver
            .resolve_list(&[temp.path().join("x.uml")], ModelFormat::Xml, &mut warnings)
            .is_none());
        assert!(resolver.resolve_dir(&temp.path().join("nope"), ModelFormat::Xml).is_none());
    }

    #[test]
    fn test_directory_takes_precedence_over_list() {
        let temp = tempfile::tempdir().expect("Failed to create temporary directory");
        let listed = temp.path().join("elsewhere/Listed.mdzip");
        touch(&listed);
        let dir = temp.path().join("archives");
        touch(&dir.join("InDir.mdzip"));

        let mut warnings = Vec::new();
        let set = StageInputResolver::new(&FsProbe)
            .resolve_either(Some(&dir), &[listed.clone()], ModelFormat::Archive, &mut warnings)
            .expect("resolves");
        assert!(set.is_from_directory());
        assert_eq!(set.len(), 1);

        assert!(warnings.is_empty());

        let missing = temp.path().join("nope");
        let set = StageInputResolver::new(&FsProbe)
            .resolve_either(Some(&missing), &[listed.clone()], ModelFormat::Archive, &mut warnings)
            .expect("falls back to list");
        assert_eq!(set.files(), &[listed]);
        assert_eq!(warnings, vec![format!("{} is not a directory", missing.display())]);
    }
}
