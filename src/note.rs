//! Note storage seam
//!
//! The preview reads a note's content and asset location and writes back only
//! through [`Note::replace_range`] followed by [`Note::save`].

use crate::error::{NoteError, NoteResult};
use crate::file_handler::{read_file_sync, write_file_atomic, write_file_atomic_sync};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Content file inside a TextBundle directory
pub const TEXT_BUNDLE_CONTENT: &str = "text.md";

/// Extension of TextBundle directories
pub const TEXT_BUNDLE_EXTENSION: &str = "textbundle";

/// Stable identity of a note
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteId(pub String);

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A note as seen by the preview
pub trait Note {
    /// Identity used to skip redundant reloads
    fn id(&self) -> NoteId;

    /// Display title
    fn title(&self) -> String;

    /// Markdown to render
    fn content(&self) -> String;

    /// Raw text with checkbox and image attachments normalized back to markdown
    fn raw_text(&self) -> String;

    /// Directory the note's relative image paths resolve against
    fn asset_root(&self) -> PathBuf;

    /// Whether the note is a self-contained bundle directory
    fn is_text_bundle(&self) -> bool {
        false
    }

    /// Replace a byte range of the raw text
    fn replace_range(&mut self, range: Range<usize>, text: &str) -> NoteResult<()>;

    /// Persist the current text
    fn save(&mut self) -> NoteResult<()>;
}

/// Replace `range` of `text`, validating it falls on character boundaries
pub fn splice(text: &mut String, range: Range<usize>, replacement: &str) -> NoteResult<()> {
    if range.start > range.end
        || range.end > text.len()
        || !text.is_char_boundary(range.start)
        || !text.is_char_boundary(range.end)
    {
        return Err(NoteError::InvalidRange {
            start: range.start,
            end: range.end,
            len: text.len(),
        });
    }
    text.replace_range(range, replacement);
    Ok(())
}

/// A note backed by a markdown file or a TextBundle directory
#[derive(Debug, Clone)]
pub struct FileNote {
    path: PathBuf,
    text: String,
}

impl FileNote {
    /// Open a note from a markdown file or a `.textbundle` directory
    pub fn open(path: impl Into<PathBuf>) -> NoteResult<Self> {
        let path = path.into();
        let content_path = Self::content_path_of(&path);
        let read = read_file_sync(&content_path)?;
        if read.lossy {
            log::warn!("{} contained invalid characters", content_path.display());
        }

        Ok(Self {
            path,
            text: read.content,
        })
    }

    /// Location the note was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Persist the current text without blocking the runtime
    pub async fn save_async(&self) -> NoteResult<()> {
        let content_path = Self::content_path_of(&self.path);
        write_file_atomic(&content_path, &self.text).await?;
        log::debug!("Saved {}", content_path.display());
        Ok(())
    }

    fn content_path_of(path: &Path) -> PathBuf {
        if is_text_bundle_path(path) {
            path.join(TEXT_BUNDLE_CONTENT)
        } else {
            path.to_path_buf()
        }
    }
}

fn is_text_bundle_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(TEXT_BUNDLE_EXTENSION))
        .unwrap_or(false)
}

impl Note for FileNote {
    fn id(&self) -> NoteId {
        NoteId(self.path.to_string_lossy().to_string())
    }

    fn title(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }

    fn content(&self) -> String {
        self.text.clone()
    }

    fn raw_text(&self) -> String {
        self.text.clone()
    }

    fn asset_root(&self) -> PathBuf {
        if self.is_text_bundle() {
            self.path.clone()
        } else {
            self.path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    fn is_text_bundle(&self) -> bool {
        is_text_bundle_path(&self.path)
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) -> NoteResult<()> {
        splice(&mut self.text, range, text)
    }

    fn save(&mut self) -> NoteResult<()> {
        let content_path = Self::content_path_of(&self.path);
        write_file_atomic_sync(&content_path, &self.text)?;
        log::debug!("Saved {}", content_path.display());
        Ok(())
    }
}
