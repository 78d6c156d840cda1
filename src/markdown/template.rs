//! Page template substitution
//!
//! The base template carries a fixed set of placeholder tokens. Rendering
//! walks the template once and substitutes each token with its context value.
//! Replacement values are never re-scanned, so substitution order does not
//! matter and a value can never resolve another token.

use crate::config::Platform;
use crate::error::{PreviewError, PreviewResult};
use std::borrow::Cow;
use std::path::Path;

/// Placeholder tokens recognized in the base template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    InlineCss,
    MathJaxJs,
    Appearance,
    Platform,
    WebPath,
    NoteBody,
}

impl Placeholder {
    /// Every placeholder, in no particular order
    pub const ALL: [Placeholder; 6] = [
        Placeholder::InlineCss,
        Placeholder::MathJaxJs,
        Placeholder::Appearance,
        Placeholder::Platform,
        Placeholder::WebPath,
        Placeholder::NoteBody,
    ];

    /// Literal token as it appears in the template
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::InlineCss => "{INLINE_CSS}",
            Placeholder::MathJaxJs => "{MATH_JAX_JS}",
            Placeholder::Appearance => "{FSNOTES_APPEARANCE}",
            Placeholder::Platform => "{FSNOTES_PLATFORM}",
            Placeholder::WebPath => "{WEB_PATH}",
            Placeholder::NoteBody => "{NOTE_BODY}",
        }
    }
}

/// Light or dark page appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

impl Appearance {
    /// Value the page scripts expect in the appearance slot
    pub fn tag(&self) -> &'static str {
        match self {
            Appearance::Light => "",
            Appearance::Dark => "darkmode",
        }
    }
}

impl Platform {
    /// Value the page scripts expect in the platform slot
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Desktop => "macos",
            Platform::Mobile => "ios",
        }
    }
}

/// Values substituted into the base template for one render
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    pub css: String,
    pub math_jax_script: String,
    pub appearance: Appearance,
    pub platform: Platform,
    pub web_path: String,
    pub body: String,
}

impl TemplateContext {
    fn value(&self, placeholder: Placeholder) -> Cow<'_, str> {
        match placeholder {
            Placeholder::InlineCss => escape_placeholders(&self.css),
            Placeholder::MathJaxJs => escape_placeholders(&self.math_jax_script),
            Placeholder::Appearance => Cow::Borrowed(self.appearance.tag()),
            Placeholder::Platform => Cow::Borrowed(self.platform.tag()),
            Placeholder::WebPath => escape_placeholders(&self.web_path),
            // Body content is inserted verbatim.
            Placeholder::NoteBody => Cow::Borrowed(&self.body),
        }
    }
}

/// Neutralize placeholder tokens inside a replacement value
fn escape_placeholders(value: &str) -> Cow<'_, str> {
    if !Placeholder::ALL.iter().any(|p| value.contains(p.token())) {
        return Cow::Borrowed(value);
    }

    let mut escaped = value.to_string();
    for placeholder in Placeholder::ALL {
        let token = placeholder.token();
        escaped = escaped.replace(token, &format!("&#123;{}", &token[1..]));
    }
    Cow::Owned(escaped)
}

/// Substitute every placeholder in `base` with its context value
pub fn render(base: &str, context: &TemplateContext) -> String {
    let mut out = String::with_capacity(base.len() + context.body.len() + context.css.len());
    let mut rest = base;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match Placeholder::ALL.iter().find(|p| tail.starts_with(p.token())) {
            Some(placeholder) => {
                out.push_str(&context.value(*placeholder));
                rest = &tail[placeholder.token().len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// A loaded base template
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    base: String,
}

impl TemplateEngine {
    /// Create an engine over an in-memory base template
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Read the base template from disk
    pub fn from_file(path: &Path) -> PreviewResult<Self> {
        std::fs::read_to_string(path)
            .map(Self::new)
            .map_err(|source| {
                log::error!("Preview template unreadable at {}: {}", path.display(), source);
                PreviewError::TemplateUnavailable {
                    path: path.to_path_buf(),
                    source,
                }
            })
    }

    /// The raw base template
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Render a page for the given context
    pub fn render(&self, context: &TemplateContext) -> String {
        render(&self.base, context)
    }
}
