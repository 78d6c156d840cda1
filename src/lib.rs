//! Note Preview - markdown note previews for embedded web views
//!
//! Renders a note into a themed page inside a sandboxed on-disk bundle and
//! handles the messages the rendered page sends back, including toggling
//! task list checkboxes in the note's text.

pub mod bridge;
pub mod config;
pub mod error;
pub mod file_handler;
pub mod markdown;
pub mod note;
pub mod preview;
pub mod utils;

pub use config::PreviewConfig;
pub use error::{PreviewError, PreviewResult, PreviewWarning};
pub use note::{FileNote, Note, NoteId};
pub use preview::{PreviewController, ViewHost};
