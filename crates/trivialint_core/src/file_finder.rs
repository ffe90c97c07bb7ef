//! Source file discovery from paths, directories and glob patterns.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::LinterError;

/// Build output directories never contain sources worth linting.
const SKIPPED_DIRS: &[&str] = &["bin", "obj", ".git", ".vs"];

pub struct FileFinder {
    extensions: Vec<String>,
    include_globs: Option<GlobSet>,
    exclude_globs: Option<GlobSet>,
}

impl FileFinder {
    pub fn new(
        extensions: &[&str],
        include: &[String],
        exclude: &[String],
    ) -> Result<Self, LinterError> {
        Ok(Self {
            extensions: extensions.iter().map(|ext| ext.to_ascii_lowercase()).collect(),
            include_globs: Self::build_globset(include)?,
            exclude_globs: Self::build_globset(exclude)?,
        })
    }

    fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, LinterError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| LinterError::config(format!("Invalid glob pattern: {}", e)))?;
            builder.add(glob);
        }

        let globset = builder
            .build()
            .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))?;

        Ok(Some(globset))
    }

    /// Checks if a file path should be ignored based on include/exclude patterns.
    pub fn should_ignore(&self, path: &Path) -> bool {
        if self
            .exclude_globs
            .as_ref()
            .is_some_and(|excludes| excludes.is_match(path))
        {
            return true;
        }

        self.include_globs
            .as_ref()
            .is_some_and(|includes| !includes.is_match(path))
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Resolves `patterns` into a sorted, deduplicated file list.
    ///
    /// A pattern naming an existing file is taken as is. A directory is
    /// walked for files with a source extension. Anything else is a glob
    /// matched against paths relative to `base_dir`.
    pub fn discover_files(
        &self,
        patterns: &[String],
        base_dir: &Path,
    ) -> Result<Vec<PathBuf>, LinterError> {
        let mut files = Vec::new();

        let mut glob_builder = GlobSetBuilder::new();
        let mut has_globs = false;

        for pattern in patterns {
            let path = Path::new(pattern);
            if path.is_file() {
                if !self.should_ignore(path) {
                    files.push(path.to_path_buf());
                }
            } else if path.is_dir() {
                self.walk(path, |file, relative| {
                    if self.has_source_extension(file) && !self.should_ignore(relative) {
                        files.push(file.to_path_buf());
                    }
                });
            } else {
                let glob = Glob::new(pattern).map_err(|e| {
                    LinterError::config(format!("Invalid pattern '{}': {}", pattern, e))
                })?;
                glob_builder.add(glob);
                has_globs = true;
            }
        }

        if has_globs {
            let glob_set = glob_builder
                .build()
                .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))?;

            self.walk(base_dir, |file, relative| {
                if glob_set.is_match(relative) && !self.should_ignore(relative) {
                    files.push(file.to_path_buf());
                }
            });
        }

        files.sort();
        files.dedup();

        info!("Discovered {} files to lint", files.len());
        Ok(files)
    }

    /// Calls `visit` with every file under `root` and its path relative to
    /// `root`.
    fn walk(&self, root: &Path, mut visit: impl FnMut(&Path, &Path)) {
        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name))
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            visit(path, relative);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn finder(include: &[&str], exclude: &[&str]) -> FileFinder {
        let owned = |patterns: &[&str]| patterns.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        FileFinder::new(&["cs"], &owned(include), &owned(exclude)).unwrap()
    }

    fn names(files: &[PathBuf], base: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(base)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/Generated")).unwrap();
        fs::create_dir_all(dir.path().join("bin/Debug")).unwrap();
        fs::write(dir.path().join("src/Program.cs"), "class P { }\n").unwrap();
        fs::write(dir.path().join("src/Generated/Model.cs"), "class M { }\n").unwrap();
        fs::write(dir.path().join("src/notes.txt"), "notes\n").unwrap();
        fs::write(dir.path().join("bin/Debug/Out.cs"), "class O { }\n").unwrap();
        dir
    }

    #[test]
    fn test_build_globset_empty() {
        assert!(FileFinder::build_globset(&[]).unwrap().is_none());
    }

    #[test]
    fn test_build_globset_invalid_pattern() {
        assert!(FileFinder::build_globset(&["[invalid".to_string()]).is_err());
    }

    #[test]
    fn test_directory_pattern_walks_sources() {
        let dir = project();
        let files = finder(&[], &[])
            .discover_files(&[dir.path().to_string_lossy().to_string()], dir.path())
            .unwrap();

        assert_eq!(
            names(&files, dir.path()),
            vec!["src/Generated/Model.cs", "src/Program.cs"]
        );
    }

    #[test]
    fn test_glob_pattern_is_relative_to_base_dir() {
        let dir = project();
        let files = finder(&[], &[])
            .discover_files(&["src/Gen*/*.cs".to_string()], dir.path())
            .unwrap();

        assert_eq!(names(&files, dir.path()), vec!["src/Generated/Model.cs"]);
    }

    #[test]
    fn test_exclude_takes_priority() {
        let dir = project();
        let files = finder(&["**/*.cs"], &["**/Generated/**"])
            .discover_files(&["**/*.cs".to_string()], dir.path())
            .unwrap();

        assert_eq!(names(&files, dir.path()), vec!["src/Program.cs"]);
    }

    #[test]
    fn test_explicit_file_and_duplicates() {
        let dir = project();
        let file = dir.path().join("src/Program.cs").to_string_lossy().to_string();
        let files = finder(&[], &[])
            .discover_files(&[file.clone(), file], dir.path())
            .unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_invalid_glob_is_config_error() {
        let dir = tempdir().unwrap();
        let err = finder(&[], &[])
            .discover_files(&["src/[".to_string()], dir.path())
            .unwrap_err();
        assert!(matches!(err, LinterError::Config(_)));
    }
}
