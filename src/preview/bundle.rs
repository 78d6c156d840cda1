//! Temporary preview bundle on disk
//!
//! A bundle is a directory holding the generated `index.html`, the static
//! preview assets (scripts and default styles) and localized images. Static
//! assets are copied once per destination; the page is rewritten atomically
//! on every render so a reader never sees a partial file.

use crate::error::{FileError, PreviewError, PreviewResult, PreviewWarning};
use crate::file_handler::{copy_file, copy_tree, ensure_dir, write_file_atomic_sync, CopyOptions};
use std::path::{Path, PathBuf};

/// Generated page inside the bundle
pub const INDEX_FILE: &str = "index.html";

/// Script whose presence marks the static assets as installed
pub const REQUIRED_SCRIPT: &str = "js/down.js";

/// Directory of bundled scripts
pub const SCRIPT_DIR: &str = "js";

/// Directory of bundled default styles
pub const STYLE_DIR: &str = "css";

/// File name the custom stylesheet is installed under
pub const CUSTOM_STYLE_FILE: &str = "main.css";

/// Result of materializing a bundle
#[derive(Debug, Clone)]
pub struct Materialized {
    /// Entry point of the bundle
    pub index: PathBuf,
    /// Static files copied during this call
    pub static_files_copied: usize,
    /// Recoverable problems
    pub warnings: Vec<PreviewWarning>,
}

impl Materialized {
    /// `file://` URL of the entry point
    pub fn url(&self) -> String {
        file_url(&self.index)
    }

    /// Directory the view host must be allowed to read
    pub fn read_access_dir(&self) -> &Path {
        self.index.parent().unwrap_or(Path::new("/"))
    }
}

/// Format a path as a `file://` URL
pub fn file_url(path: &Path) -> String {
    let display = path.to_string_lossy().replace('\\', "/");
    if display.starts_with('/') {
        format!("file://{}", display)
    } else {
        format!("file:///{}", display)
    }
}

/// A preview bundle rooted at one destination directory
#[derive(Debug, Clone)]
pub struct BundleCache {
    root: PathBuf,
    static_source: PathBuf,
    custom_css: Option<PathBuf>,
}

impl BundleCache {
    /// Create a bundle at `root` whose static assets come from `static_source`
    pub fn new(root: impl Into<PathBuf>, static_source: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            static_source: static_source.into(),
            custom_css: None,
        }
    }

    /// Replace the bundled default styles with a user stylesheet
    pub fn with_custom_css(mut self, custom_css: Option<PathBuf>) -> Self {
        self.custom_css = custom_css;
        self
    }

    /// Bundle root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the generated page
    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Whether the page and the static assets are already installed
    pub fn has_static_assets(&self) -> bool {
        self.index_path().is_file() && self.root.join(REQUIRED_SCRIPT).is_file()
    }

    /// Write `page` as the bundle's entry point, installing static assets if needed
    pub fn materialize(&self, page: &str) -> PreviewResult<Materialized> {
        ensure_dir(&self.root).map_err(|source| self.write_failed(source))?;

        let mut warnings = Vec::new();
        let mut static_files_copied = 0;

        if self.has_static_assets() {
            log::debug!("Reusing static assets in {}", self.root.display());
        } else {
            let report = copy_tree(&self.static_source, &self.root, &self.copy_options());
            static_files_copied = report.files_copied;
            warnings.extend(report.warnings);
        }

        if let Some(custom_css) = &self.custom_css {
            let target = self.root.join(CUSTOM_STYLE_FILE);
            if let Err(warning) = copy_file(custom_css, &target) {
                warnings.push(PreviewWarning::StyleOverrideFailed {
                    path: custom_css.clone(),
                    reason: warning.to_string(),
                });
            }
        }

        let index = self.index_path();
        write_file_atomic_sync(&index, page).map_err(|source| {
            log::error!("Failed to write {}: {}", index.display(), source);
            self.write_failed(source)
        })?;

        if !self.root.is_dir() || !index.is_file() {
            return Err(PreviewError::EntryPointMissing(index));
        }

        Ok(Materialized {
            index,
            static_files_copied,
            warnings,
        })
    }

    /// Run [`materialize`](Self::materialize) on the blocking thread pool
    pub async fn materialize_async(&self, page: String) -> PreviewResult<Materialized> {
        let cache = self.clone();
        tokio::task::spawn_blocking(move || cache.materialize(&page))
            .await
            .map_err(|e| {
                self.write_failed(FileError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    e.to_string(),
                )))
            })?
    }

    fn copy_options(&self) -> CopyOptions {
        // The page itself is only ever written atomically.
        let options = CopyOptions::default()
            .exclude(INDEX_FILE)
            .replace(SCRIPT_DIR)
            .replace(STYLE_DIR);

        if self.custom_css.is_some() {
            options.exclude(STYLE_DIR)
        } else {
            options
        }
    }

    fn write_failed(&self, source: FileError) -> PreviewError {
        PreviewError::BundleWriteFailed {
            path: self.root.clone(),
            source,
        }
    }
}
