//! Image localization for preview bundles
//!
//! Rendered HTML references images relative to the note's storage. The
//! preview runs sandboxed inside the bundle directory, so every local image is
//! copied into the bundle at its original relative path and its reference is
//! rewritten to carry orientation metadata and the preview marker class.
//!
//! Remote images are never touched. Failures are local to one image: the
//! reference is still rewritten (or left alone when it cannot be decoded)
//! and a warning is recorded.

use crate::error::PreviewWarning;
use crate::file_handler::copy_file;
use image::metadata::Orientation;
use image::{ImageDecoder, ImageReader};
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Class attached to every localized image
pub const PREVIEW_IMAGE_CLASS: &str = "fsnotes-preview";

/// Matches the opening of an image tag up to and including its source
const IMAGE_PATTERN: &str = r#"<img[^>]*?\bsrc="([^"]*)""#;

/// An image reference found in rendered HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Matched markup, from `<img` through the closing quote of `src`
    pub original_markup: String,
    /// Source value as written in the HTML
    pub source: String,
    /// Decoded filesystem-relative path without a leading separator
    pub relative_path: String,
    /// Whether the source lives outside note storage (`http(s)` or `data:`)
    pub is_remote: bool,
}

impl ImageReference {
    fn parse(markup: &str, source: &str) -> Result<Self, PreviewWarning> {
        let is_remote = is_remote(source);
        let relative_path = if is_remote {
            source.to_string()
        } else {
            let decoded = percent_decode_str(source).decode_utf8().map_err(|e| {
                PreviewWarning::ImageReferenceSkipped {
                    markup: markup.to_string(),
                    reason: e.to_string(),
                }
            })?;
            strip_leading_separator(&decoded).to_string()
        };

        Ok(Self {
            original_markup: markup.to_string(),
            source: source.to_string(),
            relative_path,
            is_remote,
        })
    }
}

/// A local image copied into the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedImage {
    pub reference: ImageReference,
    /// Where the copy lives inside the bundle
    pub destination: PathBuf,
    /// EXIF orientation, 0 when unknown
    pub orientation: u8,
    /// Whether the file was copied
    pub copied: bool,
}

/// Outcome of a localization pass
#[derive(Debug, Clone, Default)]
pub struct Localized {
    /// Rewritten HTML
    pub html: String,
    /// Local images in first-occurrence order
    pub images: Vec<LocalizedImage>,
    /// Recoverable problems
    pub warnings: Vec<PreviewWarning>,
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://") || source.starts_with("data:")
}

fn image_regex() -> Result<Regex, PreviewWarning> {
    Regex::new(IMAGE_PATTERN).map_err(|e| PreviewWarning::RegexScanError(e.to_string()))
}

fn strip_leading_separator(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Whether a relative path stays inside the directory it is joined to
fn stays_inside(relative: &Path) -> bool {
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Read the EXIF orientation of an image, 0 when the image carries none
pub fn read_orientation(path: &Path) -> image::ImageResult<u8> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;

    Ok(match decoder.exif_metadata()? {
        Some(exif) => Orientation::from_exif_chunk(&exif)
            .map(Orientation::to_exif)
            .unwrap_or(0),
        None => 0,
    })
}

/// Rewrites local image references to point into a preview bundle
#[derive(Debug, Clone, Default)]
pub struct ImageLocalizer {
    web_path: String,
}

impl ImageLocalizer {
    /// Create a localizer whose rewritten sources start with `web_path`
    pub fn new(web_path: impl Into<String>) -> Self {
        Self {
            web_path: web_path.into(),
        }
    }

    /// Find every image reference in `html`, in first-occurrence order
    pub fn scan(html: &str) -> Result<Vec<Result<ImageReference, PreviewWarning>>, PreviewWarning> {
        Ok(image_regex()?
            .captures_iter(html)
            .filter_map(|caps| {
                let markup = caps.get(0)?.as_str();
                let source = caps.get(1)?.as_str();
                Some(ImageReference::parse(markup, source))
            })
            .collect())
    }

    /// Whether rendered `html` references at least one image in note storage
    ///
    /// References that cannot be decoded still count, so the note goes
    /// through localization and the problem is reported as a warning.
    pub fn has_local_images(html: &str) -> bool {
        match Self::scan(html) {
            Ok(references) => references
                .iter()
                .any(|r| r.as_ref().map(|r| !r.is_remote).unwrap_or(true)),
            Err(warning) => {
                log::error!("{}", warning);
                false
            }
        }
    }

    /// Copy local images from `source_root` into `dest_root` and rewrite `html`
    pub fn localize(&self, html: &str, source_root: &Path, dest_root: &Path) -> Localized {
        let mut localized = Localized::default();

        let regex = match image_regex() {
            Ok(r) => r,
            Err(warning) => {
                log::error!("{}", warning);
                localized.html = html.to_string();
                localized.warnings.push(warning);
                return localized;
            }
        };

        // Identical markup is rewritten identically; each file is copied once.
        let mut rewritten: HashMap<String, String> = HashMap::new();

        let html = regex.replace_all(html, |caps: &Captures| {
            let markup = &caps[0];
            if let Some(done) = rewritten.get(markup) {
                return done.clone();
            }

            let replacement = match ImageReference::parse(markup, &caps[1]) {
                Ok(reference) if reference.is_remote => markup.to_string(),
                Ok(reference) => match self.localize_one(reference, source_root, dest_root) {
                    Ok((image, warnings)) => {
                        let tag = self.rewrite(&image);
                        localized.images.push(image);
                        localized.warnings.extend(warnings);
                        tag
                    }
                    Err(warning) => {
                        log::warn!("{}", warning);
                        localized.warnings.push(warning);
                        markup.to_string()
                    }
                },
                Err(warning) => {
                    log::warn!("{}", warning);
                    localized.warnings.push(warning);
                    markup.to_string()
                }
            };

            rewritten.insert(markup.to_string(), replacement.clone());
            replacement
        });

        localized.html = html.into_owned();
        localized
    }

    fn localize_one(
        &self,
        reference: ImageReference,
        source_root: &Path,
        dest_root: &Path,
    ) -> Result<(LocalizedImage, Vec<PreviewWarning>), PreviewWarning> {
        let relative = PathBuf::from(&reference.relative_path);
        if !stays_inside(&relative) {
            return Err(PreviewWarning::ImageReferenceSkipped {
                markup: reference.original_markup,
                reason: "path leaves the note storage".to_string(),
            });
        }

        let mut warnings = Vec::new();
        let source = source_root.join(&relative);
        let destination = dest_root.join(&relative);

        let copied = match copy_file(&source, &destination) {
            Ok(_) => true,
            Err(warning) => {
                warnings.push(warning);
                false
            }
        };

        let orientation = if copied {
            read_orientation(&source).unwrap_or_else(|e| {
                log::debug!("No orientation for {}: {}", source.display(), e);
                warnings.push(PreviewWarning::ImageMetadataUnavailable {
                    path: source.clone(),
                    reason: e.to_string(),
                });
                0
            })
        } else {
            0
        };

        Ok((
            LocalizedImage {
                reference,
                destination,
                orientation,
                copied,
            },
            warnings,
        ))
    }

    fn rewrite(&self, image: &LocalizedImage) -> String {
        format!(
            "<img data-orientation=\"{}\" class=\"{}\" src=\"{}{}\"",
            image.orientation,
            PREVIEW_IMAGE_CLASS,
            self.web_path,
            strip_leading_separator(&image.reference.source)
        )
    }
}
