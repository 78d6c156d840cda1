//! Bridge between the rendered preview and the host
//!
//! Handles the named messages the preview scripts post back:
//! - `newSelectionDetected`: selection capture for the copy action
//! - `clipboard`: copy text straight to the clipboard
//! - `mouse`: pointer cursor hints
//! - `checkbox`: toggling task list items in the note

pub mod checkbox;
pub mod clipboard;
pub mod platform;
pub mod router;

pub use checkbox::{parse_ordinal, scan_todos, toggle, TodoToken, ToggleOutcome};
pub use clipboard::{clean_clipboard_text, ClipboardSink, MemoryClipboard, SystemClipboard};
pub use platform::{
    capabilities_for, CursorHint, CursorShape, DesktopCapabilities, MobileCapabilities,
    PlatformCapabilities,
};
pub use router::{BridgeMessage, BridgeRouter, Dispatch, CHANNELS};
