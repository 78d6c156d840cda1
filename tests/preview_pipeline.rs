//! End-to-end preview rendering against a temporary resources directory

use note_preview::markdown::{CmarkRenderer, Placeholder};
use note_preview::preview::{BundleCache, LoadOutcome, INDEX_FILE};
use note_preview::{FileNote, PreviewConfig, PreviewController, ViewHost};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const TEMPLATE: &str = "<html class=\"{FSNOTES_APPEARANCE} {FSNOTES_PLATFORM}\">\
<style>{INLINE_CSS}</style>{MATH_JAX_JS}\
<script src=\"{WEB_PATH}js/down.js\"></script>\
<body>{NOTE_BODY}</body></html>";

#[derive(Default)]
struct MemoryView {
    pages: Vec<String>,
    files: Vec<(PathBuf, PathBuf)>,
}

impl ViewHost for MemoryView {
    fn load_html(&mut self, html: &str, _base_url: Option<&Path>) {
        self.pages.push(html.to_string());
    }

    fn load_file(&mut self, index: &Path, read_access_dir: &Path) {
        self.files.push((index.to_path_buf(), read_access_dir.to_path_buf()));
    }
}

struct Workspace {
    dir: TempDir,
    config: PreviewConfig,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let resources = dir.path().join("resources");
        fs::create_dir_all(resources.join("js")).unwrap();
        fs::create_dir_all(resources.join("css")).unwrap();
        fs::write(resources.join("index.html"), TEMPLATE).unwrap();
        fs::write(resources.join("js/down.js"), "// bridge").unwrap();
        fs::write(resources.join("css/main.css"), "body {}").unwrap();
        fs::create_dir_all(dir.path().join("notes/notes")).unwrap();

        let config = PreviewConfig {
            resources_dir: resources,
            cache_dir: dir.path().join("wkPreview"),
            math_jax: true,
            ..PreviewConfig::default()
        };
        Self { dir, config }
    }

    fn notes(&self) -> PathBuf {
        self.dir.path().join("notes")
    }

    fn note(&self, name: &str, text: &str) -> FileNote {
        let path = self.notes().join(name);
        fs::write(&path, text).unwrap();
        FileNote::open(path).unwrap()
    }

    fn controller(&self) -> PreviewController<CmarkRenderer, MemoryView> {
        PreviewController::new(self.config.clone(), CmarkRenderer::new(), MemoryView::default())
    }
}

#[test]
fn test_image_rewrite_totality() {
    let ws = Workspace::new();
    fs::write(ws.notes().join("notes/a.png"), b"png bytes").unwrap();
    let note = ws.note(
        "gallery.md",
        "![local](notes/a.png)\n\n![remote](http://x/b.png)\n\n![again](notes/a.png)",
    );

    let mut preview = ws.controller();
    let outcome = preview.load(&note, false).unwrap();
    assert!(matches!(outcome, LoadOutcome::Bundle { .. }));

    let page = fs::read_to_string(preview.bundle_index()).unwrap();
    assert_eq!(
        page.matches("data-orientation=\"0\" class=\"fsnotes-preview\" src=\"notes/a.png\"").count(),
        2
    );
    assert!(page.contains("<img src=\"http://x/b.png\""));
    assert_eq!(
        fs::read(ws.config.cache_dir.join("notes/a.png")).unwrap(),
        b"png bytes"
    );
}

#[test]
fn test_template_totality() {
    let ws = Workspace::new();
    let note = ws.note("braces.md", "Body with `{WEB_PATH}` and {curly} text");

    let mut preview = ws.controller();
    preview.load(&note, false).unwrap();
    let page = &preview.view().pages[0];

    for placeholder in Placeholder::ALL {
        if placeholder == Placeholder::WebPath {
            continue;
        }
        assert!(!page.contains(placeholder.token()), "{} unresolved", placeholder.token());
    }
    // Body content is inserted verbatim, tokens included.
    assert_eq!(page.matches("{WEB_PATH}").count(), 1);
    assert!(page.contains("<script src=\"js/down.js\"></script>"));
    assert!(page.contains("js/tex-mml-chtml.js"));
    assert!(page.contains(" macos\""));
}

#[test]
fn test_load_is_idempotent() {
    let ws = Workspace::new();
    fs::write(ws.notes().join("notes/a.png"), b"png").unwrap();
    let note = ws.note("pics.md", "![a](notes/a.png)");

    let mut preview = ws.controller();
    preview.load(&note, false).unwrap();
    let first = fs::read_to_string(preview.bundle_index()).unwrap();

    assert!(matches!(preview.load(&note, false).unwrap(), LoadOutcome::Skipped));
    preview.load(&note, true).unwrap();
    let second = fs::read_to_string(preview.bundle_index()).unwrap();

    assert_eq!(first, second);
    assert_eq!(preview.view().files.len(), 2);
    let (index, access) = &preview.view().files[0];
    assert_eq!(index.parent(), Some(access.as_path()));
}

#[test]
fn test_cache_reuse() {
    let ws = Workspace::new();
    let cache = BundleCache::new(&ws.config.cache_dir, &ws.config.resources_dir);

    let first = cache.materialize("<p>first</p>").unwrap();
    let second = cache.materialize("<p>second</p>").unwrap();

    assert_eq!(first.static_files_copied, 2);
    assert_eq!(second.static_files_copied, 0);
    assert_eq!(
        fs::read_to_string(ws.config.cache_dir.join(INDEX_FILE)).unwrap(),
        "<p>second</p>"
    );
}

#[test]
fn test_custom_style_precedence() {
    let ws = Workspace::new();
    let custom = ws.dir.path().join("custom.css");
    fs::write(&custom, "h1 { color: teal; }").unwrap();
    fs::write(ws.notes().join("notes/a.png"), b"png").unwrap();

    let config = PreviewConfig {
        custom_css: Some(custom),
        ..ws.config.clone()
    };
    let mut preview =
        PreviewController::new(config, CmarkRenderer::new(), MemoryView::default());
    let note = ws.note("styled.md", "# Styled\n\n![a](notes/a.png)");
    preview.load(&note, false).unwrap();

    let cache = &ws.config.cache_dir;
    assert!(!cache.join("css").exists());
    assert_eq!(
        fs::read_to_string(cache.join("main.css")).unwrap(),
        "h1 { color: teal; }"
    );
    let page = fs::read_to_string(cache.join(INDEX_FILE)).unwrap();
    assert!(page.contains("h1 { color: teal; }"));
}

#[test]
fn test_atomic_overwrite_under_concurrent_writers() {
    let ws = Workspace::new();
    let cache = BundleCache::new(&ws.config.cache_dir, &ws.config.resources_dir);
    cache.materialize("seed").unwrap();

    let pages: Vec<String> = (0..4)
        .map(|n| format!("<p>{}</p>", n.to_string().repeat(64 * 1024)))
        .collect();

    let done = Arc::new(AtomicBool::new(false));
    let reader = {
        let index = cache.index_path();
        let done = Arc::clone(&done);
        let pages = pages.clone();
        thread::spawn(move || {
            while !done.load(Ordering::SeqCst) {
                let content = fs::read_to_string(&index).unwrap();
                assert!(content == "seed" || pages.contains(&content), "torn read");
            }
        })
    };

    let writers: Vec<_> = pages
        .iter()
        .cloned()
        .map(|page| {
            let cache = cache.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    cache.materialize(&page).unwrap();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::SeqCst);
    reader.join().unwrap();

    let last = fs::read_to_string(cache.index_path()).unwrap();
    assert!(pages.contains(&last));
}
