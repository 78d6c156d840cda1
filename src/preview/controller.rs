//! Preview load orchestration
//!
//! A load renders the note, then takes one of two paths:
//! - pages whose rendered HTML references local images are localized into
//!   the cache bundle and the view is pointed at the bundle's `index.html`
//! - everything else is templated in memory and handed to the view as a
//!   string, resolving relative URLs against the resources directory
//!
//! A failed bundle write leaves the view on whatever it showed before.

use super::bundle::{BundleCache, Materialized};
use crate::config::PreviewConfig;
use crate::error::{PreviewResult, PreviewWarning};
use crate::markdown::{
    math_jax_script, preview_css, tag_link_css, Appearance, ImageLocalizer, MarkdownRenderer,
    TemplateContext, TemplateEngine,
};
use crate::note::{Note, NoteId};
use std::path::{Path, PathBuf};

/// The embedded web view that displays previews
pub trait ViewHost {
    /// Show an in-memory page; relative URLs resolve against `base_url`
    fn load_html(&mut self, html: &str, base_url: Option<&Path>);

    /// Show a page from disk, granting read access to `read_access_dir`
    fn load_file(&mut self, index: &Path, read_access_dir: &Path);
}

/// What a call to [`PreviewController::load`] did
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The note was already shown
    Skipped,
    /// Rendered in memory without a bundle
    FastPath,
    /// Rendered into the cache bundle
    Bundle {
        materialized: Materialized,
        /// Warnings from image localization and asset copying
        warnings: Vec<PreviewWarning>,
    },
}

impl LoadOutcome {
    /// Recoverable problems hit during the load
    pub fn warnings(&self) -> &[PreviewWarning] {
        match self {
            LoadOutcome::Bundle { warnings, .. } => warnings,
            _ => &[],
        }
    }
}

/// Build the template values for one page
pub(crate) fn page_context(
    config: &PreviewConfig,
    body: String,
    web_path: &str,
    dark: bool,
) -> TemplateContext {
    let mut css = preview_css(
        &config.style,
        &config.resources_dir,
        config.existing_custom_css(),
        false,
    );
    css.push_str(&tag_link_css(&config.style.tag_color));

    TemplateContext {
        css,
        math_jax_script: math_jax_script(config.math_jax, web_path),
        appearance: if dark { Appearance::Dark } else { Appearance::Light },
        platform: config.platform,
        web_path: web_path.to_string(),
        body,
    }
}

/// Bundle cache described by a configuration, rooted at `root`
pub(crate) fn bundle_for(config: &PreviewConfig, root: &Path) -> BundleCache {
    BundleCache::new(root, &config.resources_dir)
        .with_custom_css(config.existing_custom_css().map(Path::to_path_buf))
}

/// Drives rendering of notes into a view host
pub struct PreviewController<R, V> {
    config: PreviewConfig,
    renderer: R,
    view: V,
    system_dark: bool,
    loaded: Option<NoteId>,
}

impl<R, V> PreviewController<R, V>
where
    R: MarkdownRenderer,
    V: ViewHost,
{
    pub fn new(config: PreviewConfig, renderer: R, view: V) -> Self {
        Self {
            config,
            renderer,
            view,
            system_dark: false,
            loaded: None,
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Note currently shown, if any
    pub fn loaded(&self) -> Option<&NoteId> {
        self.loaded.as_ref()
    }

    /// Follow the host's appearance when the theme preference is `System`
    pub fn set_system_dark(&mut self, dark: bool) {
        self.system_dark = dark;
    }

    /// Location of the cache bundle's entry point
    pub fn bundle_index(&self) -> PathBuf {
        bundle_for(&self.config, &self.config.cache_dir).index_path()
    }

    /// Show `note`, unless it is already shown and `force` is false
    pub fn load(&mut self, note: &dyn Note, force: bool) -> PreviewResult<LoadOutcome> {
        let id = note.id();
        if !force && self.loaded.as_ref() == Some(&id) {
            log::debug!("Note {} already loaded", id);
            return Ok(LoadOutcome::Skipped);
        }

        let body = self.renderer.render(&note.content());
        let outcome = if ImageLocalizer::has_local_images(&body) {
            self.load_bundle(body, Some(&note.asset_root()))?
        } else {
            self.load_fast(body)?
        };

        self.loaded = Some(id);
        Ok(outcome)
    }

    /// Replace the view with an empty page through the bundle path
    pub fn clean(&mut self) -> PreviewResult<LoadOutcome> {
        let body = self.renderer.render("");
        let outcome = self.load_bundle(body, None)?;
        self.loaded = None;
        Ok(outcome)
    }

    fn template(&self) -> PreviewResult<TemplateEngine> {
        TemplateEngine::from_file(&self.config.template_path())
    }

    fn load_fast(&mut self, body: String) -> PreviewResult<LoadOutcome> {
        let template = self.template()?;
        let dark = self.config.is_dark(self.system_dark);
        let page = template.render(&page_context(&self.config, body, "", dark));

        let base_url = self.config.template_path();
        self.view.load_html(&page, Some(&base_url));
        Ok(LoadOutcome::FastPath)
    }

    fn load_bundle(
        &mut self,
        mut body: String,
        image_storage: Option<&Path>,
    ) -> PreviewResult<LoadOutcome> {
        let template = self.template()?;
        let cache_dir = self.config.cache_dir.clone();
        let mut warnings = Vec::new();

        if let Some(storage) = image_storage {
            let localized = ImageLocalizer::default().localize(&body, storage, &cache_dir);
            log::debug!(
                "Localized {} images from {}",
                localized.images.len(),
                storage.display()
            );
            warnings.extend(localized.warnings);
            body = localized.html;
        }

        let dark = self.config.is_dark(self.system_dark);
        let page = template.render(&page_context(&self.config, body, "", dark));
        let materialized = bundle_for(&self.config, &cache_dir).materialize(&page)?;
        warnings.extend(materialized.warnings.iter().cloned());

        log::info!("Preview loaded from {}", materialized.url());
        self.view
            .load_file(&materialized.index, materialized.read_access_dir());

        Ok(LoadOutcome::Bundle {
            materialized,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreviewError;
    use crate::markdown::CmarkRenderer;
    use crate::note::FileNote;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingView {
        html: Vec<String>,
        files: Vec<PathBuf>,
    }

    impl ViewHost for RecordingView {
        fn load_html(&mut self, html: &str, _base_url: Option<&Path>) {
            self.html.push(html.to_string());
        }

        fn load_file(&mut self, index: &Path, _read_access_dir: &Path) {
            self.files.push(index.to_path_buf());
        }
    }

    struct Fixture {
        _dir: TempDir,
        config: PreviewConfig,
        notes: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let resources = dir.path().join("resources");
        fs::create_dir_all(resources.join("js")).unwrap();
        fs::write(
            resources.join("index.html"),
            "<html class=\"{FSNOTES_APPEARANCE}\"><style>{INLINE_CSS}</style><body>{NOTE_BODY}</body></html>",
        )
        .unwrap();
        fs::write(resources.join("js/down.js"), "").unwrap();

        let notes = dir.path().join("notes");
        fs::create_dir_all(notes.join("img")).unwrap();
        fs::write(notes.join("img/a.png"), b"not really a png").unwrap();

        let config = PreviewConfig {
            resources_dir: resources,
            cache_dir: dir.path().join("wkPreview"),
            ..PreviewConfig::default()
        };

        Fixture {
            _dir: dir,
            config,
            notes,
        }
    }

    fn controller(config: &PreviewConfig) -> PreviewController<CmarkRenderer, RecordingView> {
        PreviewController::new(config.clone(), CmarkRenderer::new(), RecordingView::default())
    }

    fn note(fx: &Fixture, name: &str, text: &str) -> FileNote {
        let path = fx.notes.join(name);
        fs::write(&path, text).unwrap();
        FileNote::open(path).unwrap()
    }

    #[test]
    fn test_plain_note_uses_fast_path() {
        let fx = fixture();
        let mut preview = controller(&fx.config);
        let n = note(&fx, "plain.md", "# Title");

        let outcome = preview.load(&n, false).unwrap();

        assert!(matches!(outcome, LoadOutcome::FastPath));
        assert!(preview.view().html[0].contains("<h1>Title</h1>"));
        assert!(preview.view().files.is_empty());
        assert!(!fx.config.cache_dir.exists());
    }

    #[test]
    fn test_note_with_images_uses_bundle() {
        let fx = fixture();
        let mut preview = controller(&fx.config);
        let n = note(&fx, "pics.md", "![a](img/a.png)");

        let outcome = preview.load(&n, false).unwrap();

        assert!(matches!(outcome, LoadOutcome::Bundle { .. }));
        assert!(preview.view().html.is_empty());
        assert_eq!(preview.view().files, vec![preview.bundle_index()]);
        assert!(fx.config.cache_dir.join("img/a.png").is_file());

        let page = fs::read_to_string(preview.bundle_index()).unwrap();
        assert!(page.contains("class=\"fsnotes-preview\" src=\"img/a.png\""));
    }

    #[test]
    fn test_reference_and_html_images_use_bundle() {
        let fx = fixture();
        for (name, text) in [
            ("reference.md", "![cat][c]\n\n[c]: img/a.png\n"),
            ("html.md", "<img src=\"img/a.png\">\n"),
        ] {
            let mut preview = controller(&fx.config);
            let n = note(&fx, name, text);

            let outcome = preview.load(&n, false).unwrap();

            assert!(matches!(outcome, LoadOutcome::Bundle { .. }), "{}", name);
            let page = fs::read_to_string(preview.bundle_index()).unwrap();
            assert!(page.contains("class=\"fsnotes-preview\" src=\"img/a.png\""), "{}", name);
        }
    }

    #[test]
    fn test_remote_images_use_fast_path() {
        let fx = fixture();
        let mut preview = controller(&fx.config);
        let n = note(&fx, "remote.md", "![r](https://example.com/r.png)");

        assert!(matches!(preview.load(&n, false).unwrap(), LoadOutcome::FastPath));
    }

    #[test]
    fn test_load_skips_current_note() {
        let fx = fixture();
        let mut preview = controller(&fx.config);
        let n = note(&fx, "plain.md", "text");

        preview.load(&n, false).unwrap();
        assert!(matches!(preview.load(&n, false).unwrap(), LoadOutcome::Skipped));
        assert!(matches!(preview.load(&n, true).unwrap(), LoadOutcome::FastPath));
        assert_eq!(preview.view().html.len(), 2);
    }

    #[test]
    fn test_dark_theme_sets_appearance() {
        let fx = fixture();
        let mut preview = controller(&fx.config);
        preview.set_system_dark(true);
        let n = note(&fx, "plain.md", "text");

        preview.load(&n, false).unwrap();
        assert!(preview.view().html[0].contains("class=\"darkmode\""));
    }

    #[test]
    fn test_clean_writes_empty_bundle() {
        let fx = fixture();
        let mut preview = controller(&fx.config);
        let n = note(&fx, "plain.md", "text");
        preview.load(&n, false).unwrap();

        preview.clean().unwrap();

        assert!(preview.loaded().is_none());
        let page = fs::read_to_string(preview.bundle_index()).unwrap();
        assert!(page.contains("<body></body>"));
    }

    #[test]
    fn test_missing_template_shows_nothing() {
        let fx = fixture();
        let config = PreviewConfig {
            resources_dir: fx.notes.join("missing"),
            ..fx.config.clone()
        };
        let mut preview = controller(&config);
        let n = note(&fx, "plain.md", "text");

        assert!(matches!(
            preview.load(&n, false),
            Err(PreviewError::TemplateUnavailable { .. })
        ));
        assert!(preview.view().html.is_empty());
        assert!(preview.loaded().is_none());
    }

    #[test]
    fn test_failed_bundle_keeps_previous_view() {
        let fx = fixture();
        let blocker = fx.notes.join("blocker");
        fs::write(&blocker, "x").unwrap();
        let config = PreviewConfig {
            cache_dir: blocker.join("wkPreview"),
            ..fx.config.clone()
        };
        let mut preview = controller(&config);
        let n = note(&fx, "pics.md", "![a](img/a.png)");

        let err = preview.load(&n, false).unwrap_err();

        assert!(err.keeps_previous_bundle());
        assert!(preview.view().files.is_empty());
        assert!(preview.loaded().is_none());
    }
}
