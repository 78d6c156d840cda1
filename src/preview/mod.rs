//! Preview pipeline
//!
//! Loads notes into a view host through the on-disk bundle cache, exports
//! pages for the web and decides what clicked links do.

pub mod bundle;
pub mod controller;
pub mod export;
pub mod navigation;

pub use bundle::{file_url, BundleCache, Materialized, INDEX_FILE, REQUIRED_SCRIPT};
pub use controller::{LoadOutcome, PreviewController, ViewHost};
pub use export::{export_image_prefix, export_page};
pub use navigation::{classify_link, LinkAction};
