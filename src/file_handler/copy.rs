//! Best-effort file and directory copying
//!
//! Copies never abort on a single failing file. Each failure is logged and
//! recorded as a [`PreviewWarning`] in the returned report.

use crate::error::PreviewWarning;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Options for a recursive tree copy
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Top-level entries of the source that are not copied
    pub excluded: HashSet<String>,

    /// Top-level entries removed from the destination before copying
    pub replaced: HashSet<String>,
}

impl CopyOptions {
    /// Skip a top-level entry
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded.insert(name.into());
        self
    }

    /// Remove a top-level entry from the destination before copying it fresh
    pub fn replace(mut self, name: impl Into<String>) -> Self {
        self.replaced.insert(name.into());
        self
    }
}

/// Outcome of a best-effort copy
#[derive(Debug, Clone, Default)]
pub struct CopyReport {
    /// Number of files copied
    pub files_copied: usize,

    /// Per-file failures
    pub warnings: Vec<PreviewWarning>,
}

impl CopyReport {
    /// Whether every file was copied
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Copy a single file, creating the destination's parent directories
pub fn copy_file(from: &Path, to: &Path) -> Result<u64, PreviewWarning> {
    let failed = |e: std::io::Error| {
        log::warn!("Failed to copy {} to {}: {}", from.display(), to.display(), e);
        PreviewWarning::AssetCopyFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            reason: e.to_string(),
        }
    };

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(failed)?;
    }

    fs::copy(from, to).map_err(failed)
}

/// Whether the walker should descend into an entry
fn should_include(entry: &DirEntry, options: &CopyOptions) -> bool {
    if entry.depth() != 1 {
        return true;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| !options.excluded.contains(name))
        .unwrap_or(true)
}

/// Recursively copy `source` into `dest`, mirroring relative paths
pub fn copy_tree(source: &Path, dest: &Path, options: &CopyOptions) -> CopyReport {
    let mut report = CopyReport::default();

    for name in &options.replaced {
        if options.excluded.contains(name) {
            continue;
        }
        let target = dest.join(name);
        if let Err(warning) = remove_path(&target) {
            report.warnings.push(warning);
        }
    }

    let walker = WalkDir::new(source)
        .follow_links(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));

    for entry in walker.into_iter().filter_entry(|e| should_include(e, options)) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| source.to_path_buf());
                log::warn!("Could not read {}: {}", path.display(), e);
                report.warnings.push(PreviewWarning::AssetCopyFailed {
                    from: path,
                    to: dest.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(source) {
            Ok(r) => r,
            Err(_) => continue,
        };

        match copy_file(entry.path(), &dest.join(relative)) {
            Ok(_) => report.files_copied += 1,
            Err(warning) => report.warnings.push(warning),
        }
    }

    log::debug!(
        "Copied {} file(s) from {} to {}",
        report.files_copied,
        source.display(),
        dest.display()
    );

    report
}

/// Remove a file or directory if it exists
fn remove_path(path: &Path) -> Result<(), PreviewWarning> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else if path.exists() {
        fs::remove_file(path)
    } else {
        return Ok(());
    };

    result.map_err(|e| {
        log::warn!("Failed to remove {}: {}", path.display(), e);
        PreviewWarning::AssetRemoveFailed {
            path: PathBuf::from(path),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_source() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("js")).unwrap();
        fs::create_dir_all(base.join("css")).unwrap();
        fs::write(base.join("index.html"), "<html>{NOTE_BODY}</html>").unwrap();
        fs::write(base.join("js/down.js"), "// down").unwrap();
        fs::write(base.join("css/main.css"), "body {}").unwrap();
        dir
    }

    #[test]
    fn test_copy_tree_mirrors_layout() {
        let source = setup_source();
        let dest = TempDir::new().unwrap();

        let report = copy_tree(source.path(), dest.path(), &CopyOptions::default());

        assert!(report.is_clean());
        assert_eq!(report.files_copied, 3);
        assert!(dest.path().join("js/down.js").is_file());
        assert!(dest.path().join("css/main.css").is_file());
    }

    #[test]
    fn test_copy_tree_excludes_top_level() {
        let source = setup_source();
        let dest = TempDir::new().unwrap();

        let options = CopyOptions::default().exclude("css");
        let report = copy_tree(source.path(), dest.path(), &options);

        assert_eq!(report.files_copied, 2);
        assert!(!dest.path().join("css").exists());
    }

    #[test]
    fn test_copy_tree_replaces_stale_directory() {
        let source = setup_source();
        let dest = TempDir::new().unwrap();
        fs::create_dir_all(dest.path().join("js")).unwrap();
        fs::write(dest.path().join("js/stale.js"), "old").unwrap();

        let options = CopyOptions::default().replace("js");
        copy_tree(source.path(), dest.path(), &options);

        assert!(!dest.path().join("js/stale.js").exists());
        assert!(dest.path().join("js/down.js").exists());
    }

    #[test]
    fn test_copy_file_missing_source_is_warning() {
        let dest = TempDir::new().unwrap();
        let result = copy_file(Path::new("/no/such/image.png"), &dest.path().join("a/b.png"));
        assert!(matches!(result, Err(PreviewWarning::AssetCopyFailed { .. })));
    }
}
