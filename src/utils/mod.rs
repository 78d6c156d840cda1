//! Utilities module for Note Preview
//!
//! Shared helper functions:
//! - Path utilities
//! - Text utilities

/// Path utilities
pub mod path {
    use std::path::{Path, PathBuf};

    /// Check if path has a markdown extension
    pub fn is_markdown(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("md" | "markdown" | "mdown" | "mkd" | "txt")
        )
    }

    /// Expand tilde to home directory
    pub fn expand_tilde(path: &Path) -> PathBuf {
        if let Ok(stripped) = path.strip_prefix("~") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        }
        path.to_path_buf()
    }
}

/// Text utilities
pub mod text {
    /// ASCII-only name for use in URLs
    ///
    /// Letters and digits are lowercased, every other run of characters
    /// collapses to a single dash. Falls back to `note` when nothing is left.
    pub fn latin_name(title: &str) -> String {
        let mut name = String::with_capacity(title.len());
        let mut pending_dash = false;

        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_dash && !name.is_empty() {
                    name.push('-');
                }
                pending_dash = false;
                name.push(c.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }

        if name.is_empty() {
            "note".to_string()
        } else {
            name
        }
    }
}
