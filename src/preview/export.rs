//! Web export of a single note
//!
//! Builds a standalone bundle at a destination directory for publishing.
//! Images are copied next to the page like a preview, but their sources are
//! prefixed with `<web_path><latin name>/` so the page resolves them from
//! where the bundle is served.

use super::bundle::Materialized;
use super::controller::{bundle_for, page_context};
use crate::config::PreviewConfig;
use crate::error::PreviewResult;
use crate::markdown::{ImageLocalizer, MarkdownRenderer, TemplateEngine};
use crate::note::Note;
use crate::utils::text::latin_name;
use std::path::Path;

/// Image source prefix used for a note's exported page
pub fn export_image_prefix(web_path: &str, title: &str) -> String {
    format!("{}{}/", web_path, latin_name(title))
}

/// Render `note` into a publishable bundle at `dst`
pub fn export_page<R>(
    note: &dyn Note,
    dst: &Path,
    config: &PreviewConfig,
    renderer: &R,
) -> PreviewResult<Materialized>
where
    R: MarkdownRenderer + ?Sized,
{
    let template = TemplateEngine::from_file(&config.template_path())?;

    let html = renderer.render(&note.content());
    let prefix = export_image_prefix(&config.web_path, &note.title());
    let localized = ImageLocalizer::new(prefix).localize(&html, &note.asset_root(), dst);

    let context = page_context(config, localized.html, &config.web_path, config.is_dark(false));
    let mut materialized = bundle_for(config, dst).materialize(&template.render(&context))?;

    let mut warnings = localized.warnings;
    warnings.append(&mut materialized.warnings);
    materialized.warnings = warnings;

    log::info!("Exported {} to {}", note.id(), dst.display());
    Ok(materialized)
}
