//! Dispatch of messages sent by the rendered view
//!
//! The view posts named string messages in order on the host's UI context.
//! Each message goes to exactly one channel handler; the router is the only
//! stateful piece and holds the last captured selection for the view session.

use super::checkbox::{parse_ordinal, toggle, ToggleOutcome};
use super::clipboard::{clean_clipboard_text, ClipboardSink};
use super::platform::{CursorHint, PlatformCapabilities};
use crate::error::{ClipboardError, PreviewResult};
use crate::note::Note;

/// Channel carrying the current text selection
pub const CHANNEL_SELECTION: &str = "newSelectionDetected";

/// Channel carrying a clicked checkbox ordinal
pub const CHANNEL_CHECKBOX: &str = "checkbox";

/// Channel carrying pointer hover state
pub const CHANNEL_MOUSE: &str = "mouse";

/// Channel carrying text to put on the clipboard
pub const CHANNEL_CLIPBOARD: &str = "clipboard";

/// Every channel the view scripts may post to
pub const CHANNELS: [&str; 4] = [
    CHANNEL_SELECTION,
    CHANNEL_CHECKBOX,
    CHANNEL_MOUSE,
    CHANNEL_CLIPBOARD,
];

/// A message from the rendered view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeMessage {
    Selection(String),
    Checkbox(String),
    Mouse(String),
    Clipboard(String),
}

impl BridgeMessage {
    /// Build a message from a channel name and payload
    pub fn parse(channel: &str, payload: impl Into<String>) -> Option<Self> {
        let payload = payload.into();
        match channel {
            CHANNEL_SELECTION => Some(BridgeMessage::Selection(payload)),
            CHANNEL_CHECKBOX => Some(BridgeMessage::Checkbox(payload)),
            CHANNEL_MOUSE => Some(BridgeMessage::Mouse(payload)),
            CHANNEL_CLIPBOARD => Some(BridgeMessage::Clipboard(payload)),
            _ => None,
        }
    }

    /// Channel the message arrived on
    pub fn channel(&self) -> &'static str {
        match self {
            BridgeMessage::Selection(_) => CHANNEL_SELECTION,
            BridgeMessage::Checkbox(_) => CHANNEL_CHECKBOX,
            BridgeMessage::Mouse(_) => CHANNEL_MOUSE,
            BridgeMessage::Clipboard(_) => CHANNEL_CLIPBOARD,
        }
    }
}

/// What handling a message did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    SelectionCaptured,
    ClipboardSet,
    Cursor(CursorHint),
    Checkbox(ToggleOutcome),
    /// The payload was not understood or no note is attached
    Ignored,
}

/// Routes view messages to their handlers
pub struct BridgeRouter<P, C> {
    platform: P,
    clipboard: C,
    selection: Option<String>,
}

impl<P, C> BridgeRouter<P, C>
where
    P: PlatformCapabilities,
    C: ClipboardSink,
{
    pub fn new(platform: P, clipboard: C) -> Self {
        Self {
            platform,
            clipboard,
            selection: None,
        }
    }

    /// Last selection reported by the view
    pub fn last_selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Handle a raw channel message
    pub fn receive(
        &mut self,
        channel: &str,
        payload: &str,
        note: Option<&mut dyn Note>,
    ) -> PreviewResult<Dispatch> {
        match BridgeMessage::parse(channel, payload) {
            Some(message) => self.route(message, note),
            None => {
                log::warn!("Message on unknown channel {:?}", channel);
                Ok(Dispatch::Ignored)
            }
        }
    }

    /// Handle one message; `note` is the note shown in the view, if any
    pub fn route(
        &mut self,
        message: BridgeMessage,
        note: Option<&mut dyn Note>,
    ) -> PreviewResult<Dispatch> {
        match message {
            BridgeMessage::Selection(text) => {
                self.selection = Some(text.trim().to_string());
                Ok(Dispatch::SelectionCaptured)
            }
            BridgeMessage::Clipboard(text) => {
                self.clipboard.set_text(clean_clipboard_text(&text))?;
                Ok(Dispatch::ClipboardSet)
            }
            BridgeMessage::Mouse(payload) => match CursorHint::parse(&payload) {
                Some(hint) => {
                    self.platform.cursor_hint(hint);
                    Ok(Dispatch::Cursor(hint))
                }
                None => Ok(Dispatch::Ignored),
            },
            BridgeMessage::Checkbox(payload) => {
                let (Some(ordinal), Some(note)) = (parse_ordinal(&payload), note) else {
                    log::debug!("Ignoring checkbox message {:?}", payload);
                    return Ok(Dispatch::Ignored);
                };

                let outcome = toggle(note, ordinal)?;
                if matches!(outcome, ToggleOutcome::Toggled { .. }) {
                    self.platform.toggle_feedback();
                }
                Ok(Dispatch::Checkbox(outcome))
            }
        }
    }

    /// Copy the last captured selection to the clipboard
    ///
    /// Returns `false` when nothing has been selected yet.
    pub fn copy_selection(&mut self) -> Result<bool, ClipboardError> {
        match self.selection.as_deref() {
            Some(text) => {
                self.clipboard.set_text(text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
