//! Platform capabilities used by bridge handlers
//!
//! Desktop hosts have a pointer cursor; mobile hosts have haptics instead.
//! The host picks one implementation when it builds the router.

use crate::config::Platform;

/// Hover state reported by the rendered view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Enter,
    Leave,
}

impl CursorHint {
    /// Parse a mouse channel payload
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "enter" => Some(CursorHint::Enter),
            "leave" => Some(CursorHint::Leave),
            _ => None,
        }
    }
}

/// Cursor shape shown over the preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Arrow,
    PointingHand,
}

/// Behavior that differs between pointer and touch hosts
pub trait PlatformCapabilities {
    /// Which platform these capabilities belong to
    fn platform(&self) -> Platform;

    /// React to the pointer entering or leaving an interactive element
    fn cursor_hint(&mut self, hint: CursorHint);

    /// Short cue after a checkbox is toggled
    fn toggle_feedback(&mut self);
}

/// Pointer-driven host
#[derive(Default)]
pub struct DesktopCapabilities {
    cursor: CursorShape,
    on_cursor: Option<Box<dyn FnMut(CursorShape)>>,
}

impl DesktopCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward cursor changes to the host's windowing layer
    pub fn on_cursor(mut self, callback: impl FnMut(CursorShape) + 'static) -> Self {
        self.on_cursor = Some(Box::new(callback));
        self
    }

    /// Cursor currently requested by the preview
    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }
}

impl PlatformCapabilities for DesktopCapabilities {
    fn platform(&self) -> Platform {
        Platform::Desktop
    }

    fn cursor_hint(&mut self, hint: CursorHint) {
        self.cursor = match hint {
            CursorHint::Enter => CursorShape::PointingHand,
            CursorHint::Leave => CursorShape::Arrow,
        };
        if let Some(callback) = self.on_cursor.as_mut() {
            callback(self.cursor);
        }
    }

    fn toggle_feedback(&mut self) {}
}

/// Touch-driven host
#[derive(Default)]
pub struct MobileCapabilities {
    haptic: Option<Box<dyn FnMut()>>,
}

impl MobileCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play a haptic or audio cue through the host
    pub fn on_haptic(mut self, callback: impl FnMut() + 'static) -> Self {
        self.haptic = Some(Box::new(callback));
        self
    }
}

impl PlatformCapabilities for MobileCapabilities {
    fn platform(&self) -> Platform {
        Platform::Mobile
    }

    // No pointer on touch hosts.
    fn cursor_hint(&mut self, _hint: CursorHint) {}

    fn toggle_feedback(&mut self) {
        if let Some(haptic) = self.haptic.as_mut() {
            haptic();
        }
    }
}

/// Capabilities for a configured platform
pub fn capabilities_for(platform: Platform) -> Box<dyn PlatformCapabilities> {
    match platform {
        Platform::Desktop => Box::new(DesktopCapabilities::new()),
        Platform::Mobile => Box::new(MobileCapabilities::new()),
    }
}

impl PlatformCapabilities for Box<dyn PlatformCapabilities> {
    fn platform(&self) -> Platform {
        (**self).platform()
    }

    fn cursor_hint(&mut self, hint: CursorHint) {
        (**self).cursor_hint(hint)
    }

    fn toggle_feedback(&mut self) {
        (**self).toggle_feedback()
    }
}
