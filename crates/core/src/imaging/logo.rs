//! Brand logo placement and compositing.
//!
//! The logo is always drawn last, on the final-size canvas, at a fixed
//! near-top-left offset inside the zone the prompt composer kept clear.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::canvas::{AspectBucket, CanvasSize};

use super::ImagingError;

/// Logo box edge as a percentage of the smaller canvas side.
pub const DEFAULT_LOGO_PERCENT: f64 = 18.0;
pub const MIN_LOGO_PERCENT: f64 = 5.0;
pub const MAX_LOGO_PERCENT: f64 = 50.0;
/// Pixel bounds for the logo box edge.
pub const MIN_LOGO_PX: u32 = 60;
pub const MAX_LOGO_PX: u32 = 500;
/// Alpha at or below which a logo pixel counts as padding.
pub const LOGO_ALPHA_THRESHOLD: u8 = 10;
/// Horizontal offset from the left edge, relative to canvas width.
pub const LOGO_OFFSET_X: f64 = 0.02;

/// Where and how large the logo is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl LogoPlacement {
    /// Compute the placement of a `logo_w x logo_h` logo on `canvas`.
    ///
    /// `percent` defaults to [`DEFAULT_LOGO_PERCENT`] and is clamped to
    /// `[MIN_LOGO_PERCENT, MAX_LOGO_PERCENT]`. The resulting box edge is
    /// clamped to `[MIN_LOGO_PX, MAX_LOGO_PX]` and never exceeds the canvas.
    /// The logo keeps its own aspect ratio inside that box.
    pub fn compute(canvas: CanvasSize, logo_w: u32, logo_h: u32, percent: Option<f64>) -> Self {
        let percent = percent
            .filter(|p| p.is_finite())
            .unwrap_or(DEFAULT_LOGO_PERCENT)
            .clamp(MIN_LOGO_PERCENT, MAX_LOGO_PERCENT);

        let min_side = canvas.min_side().max(1);
        let box_px = ((f64::from(min_side) * percent / 100.0).round() as u32)
            .clamp(MIN_LOGO_PX, MAX_LOGO_PX)
            .min(min_side);

        let longest = logo_w.max(logo_h).max(1);
        let scale = f64::from(box_px) / f64::from(longest);
        let width = ((f64::from(logo_w) * scale).round() as u32).clamp(1, box_px);
        let height = ((f64::from(logo_h) * scale).round() as u32).clamp(1, box_px);

        let x = (f64::from(canvas.width) * LOGO_OFFSET_X).floor() as u32;
        let y = (f64::from(canvas.height) * offset_y_fraction(canvas.bucket())).floor() as u32;

        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Vertical offset relative to canvas height; wide canvases sit the logo
/// closer to the top edge so it does not eat into the short dimension.
fn offset_y_fraction(bucket: AspectBucket) -> f64 {
    match bucket {
        AspectBucket::WideBanner => 0.007,
        AspectBucket::Landscape => 0.010,
        AspectBucket::Square => 0.012,
        AspectBucket::Portrait | AspectBucket::Tall => 0.015,
    }
}

/// Crop fully transparent padding (alpha <= [`LOGO_ALPHA_THRESHOLD`]).
///
/// Returns `None` when the logo has no visible pixel at all.
pub fn trim_transparent(logo: &RgbaImage) -> Option<RgbaImage> {
    let (w, h) = logo.dimensions();
    let mut min_x = w;
    let mut min_y = h;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut found = false;

    for (x, y, px) in logo.enumerate_pixels() {
        if px.0[3] > LOGO_ALPHA_THRESHOLD {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if !found {
        return None;
    }
    Some(imageops::crop_imm(logo, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1).to_image())
}

/// Decode `logo_bytes`, trim it, scale it and draw it over `canvas`.
pub fn composite_logo(
    canvas: &mut RgbaImage,
    logo_bytes: &[u8],
    percent: Option<f64>,
) -> Result<LogoPlacement, ImagingError> {
    let decoded = image::load_from_memory(logo_bytes).map_err(ImagingError::Decode)?;
    let logo = trim_transparent(&decoded.to_rgba8()).ok_or(ImagingError::EmptyLogo)?;

    let size = CanvasSize::new(canvas.width(), canvas.height());
    let placement = LogoPlacement::compute(size, logo.width(), logo.height(), percent);
    let scaled = imageops::resize(&logo, placement.width, placement.height, FilterType::Lanczos3);
    imageops::overlay(
        canvas,
        &scaled,
        i64::from(placement.x),
        i64::from(placement.y),
    );
    Ok(placement)
}
