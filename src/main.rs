//! Note Preview - command line front end
//!
//! Entry point for the binary. Handles CLI argument parsing, logging
//! initialization and running one preview, export or toggle.

use anyhow::{bail, Context};
use note_preview::bridge::{capabilities_for, router, BridgeRouter, Dispatch, MemoryClipboard};
use note_preview::config::{Platform, ThemePreference};
use note_preview::markdown::CmarkRenderer;
use note_preview::preview::{export_page, file_url, LoadOutcome};
use note_preview::utils::path::{expand_tilde, is_markdown};
use note_preview::{FileNote, Note, PreviewConfig, PreviewController, ViewHost};
use std::path::{Path, PathBuf};

/// Application name for logging
const APP_NAME: &str = "note-preview";

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    file: Option<PathBuf>,
    export: Option<PathBuf>,
    toggle: Option<String>,
    resources: Option<PathBuf>,
    dest: Option<PathBuf>,
    custom_css: Option<PathBuf>,
    dark: bool,
    mobile: bool,
    math: bool,
}

/// View host that reports what would be shown
struct TerminalView;

impl ViewHost for TerminalView {
    fn load_html(&mut self, html: &str, _base_url: Option<&Path>) {
        println!("{}", html);
    }

    fn load_file(&mut self, index: &Path, _read_access_dir: &Path) {
        println!("{}", file_url(index));
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let options = parse_args()?;
    let Some(file) = options.file.clone() else {
        print_help();
        bail!("no note given");
    };

    let config = build_config(&options);
    let note_path = expand_tilde(&file);
    if note_path.is_file() && !is_markdown(&note_path) {
        log::warn!("{} does not look like a markdown note", note_path.display());
    }
    let mut note = FileNote::open(&note_path)
        .with_context(|| format!("opening {}", note_path.display()))?;

    if let Some(ordinal) = &options.toggle {
        return run_toggle(&config, &mut note, ordinal);
    }

    if let Some(dst) = &options.export {
        let dst = expand_tilde(dst);
        let result = export_page(&note, &dst, &config, &CmarkRenderer::new())
            .with_context(|| format!("exporting to {}", dst.display()))?;
        report_warnings(result.warnings.iter());
        println!("{}", result.url());
        return Ok(());
    }

    let mut preview = PreviewController::new(config, CmarkRenderer::new(), TerminalView);
    let outcome = preview.load(&note, true).map_err(|e| {
        if e.keeps_previous_bundle() {
            log::warn!("Previous preview left in place");
        }
        anyhow::anyhow!(e.user_message())
    })?;

    if matches!(outcome, LoadOutcome::FastPath) {
        log::debug!("No local images, page rendered without a bundle");
    }
    report_warnings(outcome.warnings().iter());
    Ok(())
}

/// Toggle a checkbox the same way a click in the preview does
fn run_toggle(config: &PreviewConfig, note: &mut FileNote, ordinal: &str) -> anyhow::Result<()> {
    let mut bridge = BridgeRouter::new(capabilities_for(config.platform), MemoryClipboard::new());

    match bridge.receive(router::CHANNEL_CHECKBOX, ordinal, Some(note as &mut dyn Note))? {
        Dispatch::Checkbox(outcome) => {
            println!("{:?}", outcome);
            Ok(())
        }
        _ => bail!("invalid checkbox ordinal {:?}", ordinal),
    }
}

fn report_warnings<'a>(warnings: impl Iterator<Item = &'a note_preview::PreviewWarning>) {
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
}

/// Load stored configuration and apply command line overrides
fn build_config(options: &Options) -> PreviewConfig {
    let mut config = PreviewConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load configuration, using defaults: {}", e);
        PreviewConfig::default()
    });

    if let Some(resources) = &options.resources {
        config.resources_dir = expand_tilde(resources);
    }
    if let Some(dest) = &options.dest {
        config.cache_dir = expand_tilde(dest);
    }
    if let Some(css) = &options.custom_css {
        config.custom_css = Some(expand_tilde(css));
    }
    if options.dark {
        config.theme = ThemePreference::Dark;
    }
    if options.mobile {
        config.platform = Platform::Mobile;
    }
    if options.math {
        config.math_jax = true;
    }

    config
}

/// Initialize the logging system
fn init_logging() {
    // Set default log level if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,note_preview=debug");
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();
}

/// Parse command line arguments
fn parse_args() -> anyhow::Result<Options> {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "--export" => {
                options.export = Some(PathBuf::from(value_of(&args, i)?));
                i += 1;
            }
            "--toggle" => {
                options.toggle = Some(value_of(&args, i)?.to_string());
                i += 1;
            }
            "--resources" => {
                options.resources = Some(PathBuf::from(value_of(&args, i)?));
                i += 1;
            }
            "--dest" => {
                options.dest = Some(PathBuf::from(value_of(&args, i)?));
                i += 1;
            }
            "--custom-css" => {
                options.custom_css = Some(PathBuf::from(value_of(&args, i)?));
                i += 1;
            }
            "--dark" => options.dark = true,
            "--mobile" => options.mobile = true,
            "--math" => options.math = true,
            arg if arg.starts_with('-') => {
                bail!("unknown option: {} (use --help for usage information)", arg);
            }
            arg => {
                if options.file.is_some() {
                    bail!("only one note can be previewed at a time");
                }
                options.file = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Value following the option at `i`
fn value_of(args: &[String], i: usize) -> anyhow::Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .with_context(|| format!("{} requires an argument", args[i]))
}

/// Print help message
fn print_help() {
    println!(
        r#"Note Preview - render markdown notes into preview bundles

USAGE:
    note-preview [OPTIONS] FILE

FILE is a markdown note or a .textbundle directory.

OPTIONS:
    -h, --help              Show this help message
    -v, --version           Show version information
    --export DIR            Build a publishable page in DIR
    --toggle N              Toggle the N-th checkbox (from 0) and save
    --resources DIR         Template and static asset directory
    --dest DIR              Preview bundle directory
    --custom-css FILE       Stylesheet replacing the default styles
    --dark                  Render in dark mode
    --mobile                Render for touch devices
    --math                  Load MathJax

EXAMPLES:
    note-preview notes/todo.md                  Print the preview entry point
    note-preview --toggle 2 notes/todo.md       Check the third task
    note-preview --export site/ notes/trip.md   Build a page for the web
"#
    );
}

/// Print version information
fn print_version() {
    println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
}
