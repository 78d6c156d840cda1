//! Markdown module for Note Preview
//!
//! Turns note markdown into a finished preview page:
//! - Markdown to HTML rendering
//! - Image localization into the preview bundle
//! - Generated styles and the MathJax loader
//! - Page template substitution

pub mod image;
pub mod renderer;
pub mod style;
pub mod template;

pub use image::{
    read_orientation, ImageLocalizer, ImageReference, Localized, LocalizedImage,
    PREVIEW_IMAGE_CLASS,
};
pub use renderer::{cmark_options, CmarkRenderer, MarkdownRenderer};
pub use style::{math_jax_script, preview_css, tag_link_css};
pub use template::{render, Appearance, Placeholder, TemplateContext, TemplateEngine};
