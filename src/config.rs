//! Configuration management for Note Preview
//!
//! Handles loading, saving, and resolving preview configuration.
//! Configuration is persisted as JSON under the platform config directory.

use crate::error::{ConfigError, ConfigResult};
use crate::file_handler::write_file_atomic_sync;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier following reverse-DNS convention
pub const APP_ID: &str = "com.notes.Preview";

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "preview.json";

/// Name of the default preview cache directory under the temp dir
pub const PREVIEW_CACHE_DIR: &str = "wkPreview";

/// Maximum note size to render (in bytes) - 10MB
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Preview configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Directory holding the base template (`index.html`) and static assets
    pub resources_dir: PathBuf,

    /// User stylesheet replacing the bundled default styles
    pub custom_css: Option<PathBuf>,

    /// Include the MathJax loader in rendered pages
    pub math_jax: bool,

    /// Theme preference for the appearance tag
    pub theme: ThemePreference,

    /// Platform the preview is displayed on
    pub platform: Platform,

    /// URL prefix used for web exports
    pub web_path: String,

    /// Root of the temporary preview bundle
    pub cache_dir: PathBuf,

    /// Typography used for generated styles
    pub style: StyleConfig,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            resources_dir: PathBuf::from("resources/preview"),
            custom_css: None,
            math_jax: false,
            theme: ThemePreference::System,
            platform: Platform::Desktop,
            web_path: String::new(),
            cache_dir: std::env::temp_dir().join(PREVIEW_CACHE_DIR),
            style: StyleConfig::default(),
        }
    }
}

impl PreviewConfig {
    /// Load configuration from the config directory or return defaults
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific file, falling back to defaults if absent
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            log::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to the config directory
    pub fn save(&self) -> ConfigResult<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;

        write_file_atomic_sync(path, &content).map_err(|e| ConfigError::SaveError(e.to_string()))
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the configuration file path
    pub fn config_path() -> ConfigResult<PathBuf> {
        Self::config_dir().map(|p| p.join(CONFIG_FILE_NAME))
    }

    /// Path of the base template inside the resources directory
    pub fn template_path(&self) -> PathBuf {
        self.resources_dir.join("index.html")
    }

    /// Custom stylesheet, if one is configured and present on disk
    pub fn existing_custom_css(&self) -> Option<&Path> {
        self.custom_css
            .as_deref()
            .filter(|path| path.is_file())
    }

    /// Whether the preview should render in dark mode
    pub fn is_dark(&self, system_dark: bool) -> bool {
        match self.theme {
            ThemePreference::System => system_dark,
            ThemePreference::Light => false,
            ThemePreference::Dark => true,
        }
    }
}

/// Typography settings used to build the preview stylesheet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    /// Font family for note text
    pub font_family: String,

    /// Font size for note text in pixels
    pub font_size: u32,

    /// Font family for code
    pub code_font_family: String,

    /// Font size for code in pixels
    pub code_font_size: u32,

    /// Extra spacing between lines in pixels
    pub line_spacing: f32,

    /// Line height of the note font in pixels
    pub font_line_height: f32,

    /// Horizontal inset of the editor in pixels
    pub editor_width: u32,

    /// Name of the code highlighting theme stylesheet
    pub code_theme: String,

    /// Constrain image height to the viewport
    pub fixed_image_height: bool,

    /// Background color for tag links
    pub tag_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "Helvetica Neue".to_string(),
            font_size: 14,
            code_font_family: "Source Code Pro".to_string(),
            code_font_size: 13,
            line_spacing: 4.0,
            font_line_height: 17.0,
            editor_width: 10,
            code_theme: "atom-one-light".to_string(),
            fixed_image_height: true,
            tag_color: "#6692cb".to_string(),
        }
    }
}

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemePreference {
    /// Follow system theme
    #[default]
    System,
    /// Always use light theme
    Light,
    /// Always use dark theme
    Dark,
}

/// Platform class of the view host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Platform {
    /// Pointer-driven desktop host
    #[default]
    Desktop,
    /// Touch-driven mobile host
    Mobile,
}
