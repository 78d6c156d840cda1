//! Error types for Note Preview
//!
//! This module defines the error and warning types used throughout the preview
//! pipeline. Fatal errors abort a render pass; warnings are collected and
//! reported alongside a best-effort result.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for a preview pass
#[derive(Error, Debug)]
pub enum PreviewError {
    /// The base template could not be read; no page is produced
    #[error("Preview template unavailable: {path}")]
    TemplateUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bundle directory or its index file could not be written
    #[error("Could not write preview bundle at {path}")]
    BundleWriteFailed {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    /// The bundle was written but its entry point does not exist afterwards
    #[error("Preview entry point missing after write: {0}")]
    EntryPointMissing(PathBuf),

    /// File I/O related errors
    #[error(transparent)]
    FileIO(#[from] FileError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Note storage errors
    #[error(transparent)]
    Note(#[from] NoteError),

    /// Clipboard errors
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// File I/O related errors
#[derive(Error, Debug)]
pub enum FileError {
    /// File not found at specified path
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// File is too large (alternate format)
    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Error reading file
    #[error("Could not read file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error during atomic write (temp file creation)
    #[error("Could not create temporary file for safe save: {path}")]
    AtomicWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error renaming temp file to target
    #[error("Could not complete file save (rename failed): {path}")]
    RenameError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory operation error
    #[error("Directory error: {path}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {0}")]
    LoadError(String),

    /// Error saving configuration
    #[error("Could not save configuration: {0}")]
    SaveError(String),

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(String),

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Errors raised by the note storage collaborator
#[derive(Error, Debug)]
pub enum NoteError {
    /// Range does not fall on the note's text
    #[error("Invalid text range: {start}..{end} (length {len})")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// Reading or persisting the note failed
    #[error("Note storage error: {0}")]
    Storage(#[from] FileError),
}

/// Clipboard related errors
#[derive(Error, Debug, Clone)]
pub enum ClipboardError {
    /// Could not access clipboard
    #[error("Could not access clipboard: {0}")]
    AccessError(String),

    /// Error setting clipboard content
    #[error("Could not write to clipboard: {0}")]
    WriteError(String),
}

/// Recoverable problems encountered during a best-effort pass
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreviewWarning {
    /// A single file could not be copied into the bundle
    #[error("Could not copy {from} to {to}: {reason}")]
    AssetCopyFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// A stale static asset could not be removed before re-copying
    #[error("Could not remove {path}: {reason}")]
    AssetRemoveFailed { path: PathBuf, reason: String },

    /// Orientation metadata could not be read; 0 was used
    #[error("No orientation metadata for {path}: {reason}")]
    ImageMetadataUnavailable { path: PathBuf, reason: String },

    /// An image reference could not be decoded and was left as-is
    #[error("Skipped image reference {markup}: {reason}")]
    ImageReferenceSkipped { markup: String, reason: String },

    /// The image scanner could not run; images were left untouched
    #[error("Image scan failed: {0}")]
    RegexScanError(String),

    /// The custom stylesheet could not be copied into the bundle
    #[error("Could not apply custom stylesheet {path}: {reason}")]
    StyleOverrideFailed { path: PathBuf, reason: String },
}

/// Result type alias for preview operations
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Result type alias for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for note storage operations
pub type NoteResult<T> = Result<T, NoteError>;

impl PreviewError {
    /// Short message suitable for a status line in the host
    pub fn user_message(&self) -> String {
        match self {
            PreviewError::TemplateUnavailable { .. } => {
                "Preview is unavailable: the page template could not be read.".to_string()
            }
            PreviewError::BundleWriteFailed { .. } | PreviewError::EntryPointMissing(_) => {
                "Preview could not be written to disk. Check free space and permissions."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Whether the controller should keep showing the previous bundle
    pub fn keeps_previous_bundle(&self) -> bool {
        matches!(
            self,
            PreviewError::BundleWriteFailed { .. } | PreviewError::EntryPointMissing(_)
        )
    }
}
