//! Post-processing of provider output into the final design PNG.
//!
//! Order is fixed: optional light-border trim, fill-resize to the requested
//! canvas, then the brand logo on top. Everything here is CPU-bound and
//! synchronous; async callers run it on a blocking thread.

pub mod logo;
pub mod resize;
pub mod trim;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::canvas::CanvasSize;

pub use logo::{composite_logo, LogoPlacement};
pub use resize::resize_to_target;
pub use trim::trim_light_border;

#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Logo has no visible pixels")]
    EmptyLogo,
}

/// Logo to draw on the final canvas.
#[derive(Debug, Clone)]
pub struct LogoOverlay {
    pub bytes: Vec<u8>,
    /// Logo size as a percentage of the smaller canvas side.
    pub size_percent: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PostProcessOptions {
    pub target: CanvasSize,
    pub trim_borders: bool,
    pub logo: Option<LogoOverlay>,
}

/// Final PNG plus what was done to get there.
#[derive(Debug, Clone)]
pub struct PostProcessOutcome {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub resized: bool,
    pub trimmed: bool,
    pub logo: Option<LogoPlacement>,
    /// Non-fatal problems, e.g. a logo that could not be decoded.
    pub warnings: Vec<String>,
}

/// Turn raw provider bytes into the final PNG.
///
/// Only a failure to decode the source or encode the result is an error.
/// A broken logo is skipped and reported in `warnings`.
pub fn post_process(
    source: &[u8],
    options: &PostProcessOptions,
) -> Result<PostProcessOutcome, ImagingError> {
    let img = image::load_from_memory(source).map_err(ImagingError::Decode)?;
    let (source_width, source_height) = (img.width(), img.height());

    let (img, trimmed) = if options.trim_borders {
        match trim_light_border(&img) {
            Some(cropped) => (cropped, true),
            None => (img, false),
        }
    } else {
        (img, false)
    };

    let (img, resized) = resize_to_target(img, options.target);
    let mut canvas = img.to_rgba8();

    let mut warnings = Vec::new();
    let logo = match &options.logo {
        Some(overlay) => match composite_logo(&mut canvas, &overlay.bytes, overlay.size_percent) {
            Ok(placement) => Some(placement),
            Err(e) => {
                warnings.push(format!("Logo skipped: {e}"));
                None
            }
        },
        None => None,
    };

    let png = encode_png(DynamicImage::ImageRgba8(canvas))?;
    Ok(PostProcessOutcome {
        png,
        width: options.target.width,
        height: options.target.height,
        source_width,
        source_height,
        resized,
        trimmed,
        logo,
        warnings,
    })
}

/// Encode an image as PNG.
pub fn encode_png(img: DynamicImage) -> Result<Vec<u8>, ImagingError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(ImagingError::Encode)?;
    Ok(buf.into_inner())
}
