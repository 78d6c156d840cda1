//! Clipboard targets for the bridge
//!
//! Uses the arboard crate for system clipboard access. An in-memory target
//! is available for headless hosts.

use crate::error::ClipboardError;
use arboard::Clipboard;

/// Somewhere text can be copied to
pub trait ClipboardSink {
    /// Replace the clipboard contents with `text`
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard
///
/// arboard's Clipboard is not Send/Sync on all platforms, so a handle is
/// opened per operation.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        match Clipboard::new() {
            Ok(mut clipboard) => clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::WriteError(e.to_string())),
            Err(e) => Err(ClipboardError::AccessError(e.to_string())),
        }
    }
}

/// Clipboard held in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Normalize text sent on the clipboard channel
///
/// Trailing whitespace goes, including the newline browsers append to
/// block selections.
pub fn clean_clipboard_text(text: &str) -> &str {
    let trimmed = text.trim_end();
    trimmed.strip_suffix('\n').unwrap_or(trimmed)
}
