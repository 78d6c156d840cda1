//! Generated styles and scripts for preview pages

use crate::config::StyleConfig;
use std::path::Path;

/// Rule applied when images are constrained to the viewport
const FIXED_IMAGE_HEIGHT_CSS: &str = "img { max-width: 100%; max-height: 90vh; }";

/// Fallback family for system fonts that cannot be addressed by name
const FALLBACK_FONT_FAMILY: &str = "Helvetica Neue";

/// Build the inline stylesheet for a preview page
///
/// Typography rules come first, then the code highlighting theme found under
/// `resources_dir/highlight/`, then either the custom stylesheet contents or
/// the default image rule.
pub fn preview_css(
    style: &StyleConfig,
    resources_dir: &Path,
    custom_css: Option<&Path>,
    full_screen: bool,
) -> String {
    let mut css = if style.fixed_image_height {
        FIXED_IMAGE_HEIGHT_CSS.to_string()
    } else {
        String::new()
    };

    if let Some(path) = custom_css {
        match std::fs::read_to_string(path) {
            Ok(content) => css = content,
            Err(e) => log::warn!("Custom stylesheet {} unreadable: {}", path.display(), e),
        }
    }

    let theme_path = resources_dir
        .join("highlight")
        .join(format!("{}.min.css", style.code_theme));
    let code_style = std::fs::read_to_string(&theme_path).unwrap_or_default();

    let family = if style.font_family.starts_with('.') {
        FALLBACK_FONT_FAMILY
    } else {
        style.font_family.as_str()
    };

    let width = if full_screen { 0 } else { style.editor_width };
    let code_line_height = style.line_spacing / 2.0 + style.code_font_size as f32 + 3.0;
    let line_height = (style.line_spacing + style.font_line_height) as u32;

    format!(
        "body {{font: {}px '{}', '-apple-system'; margin: 0 {}px; }} \
         code, pre {{font: {}px '{}', Courier, monospace, 'Liberation Mono', Menlo; line-height: {}px; }} \
         img {{display: block; margin: 0 auto;}} \
         p, li, blockquote, dl, ol, ul {{ line-height: {}px; }} {} {}",
        style.font_size,
        family,
        width + 5,
        style.code_font_size,
        style.code_font_family,
        code_line_height,
        line_height,
        code_style,
        css
    )
}

/// Rule highlighting tag links in the preview
pub fn tag_link_css(tag_color: &str) -> String {
    format!(" a[href^=\"fsnotes://open/?tag=\"] {{ background: {}; }}", tag_color)
}

/// MathJax configuration and loader, or nothing when disabled
pub fn math_jax_script(enabled: bool, web_path: &str) -> String {
    if !enabled {
        return String::new();
    }

    format!(
        r#"<script>
MathJax = {{
  tex: {{
    inlineMath: [['$', '$'], ['\\(', '\\)']]
  }}
}};
</script>
<script id="MathJax-script" async src="{}js/tex-mml-chtml.js"></script>"#,
        web_path
    )
}
