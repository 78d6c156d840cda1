//! Markdown to HTML rendering
//!
//! The preview pipeline only needs a pure `markdown -> html` function.
//! [`CmarkRenderer`] is the default implementation.

use pulldown_cmark::{html, Options, Parser};

/// Converts markdown source into an HTML fragment
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// CommonMark renderer with the GitHub-style extensions notes rely on
#[derive(Debug, Clone)]
pub struct CmarkRenderer {
    options: Options,
}

/// Parser options used for rendering and for locating checkboxes
pub fn cmark_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

impl CmarkRenderer {
    pub fn new() -> Self {
        Self {
            options: cmark_options(),
        }
    }
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_content = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_content, parser);
        html_content
    }
}
