//! Heuristic removal of light borders some models paint around designs.
//!
//! Each edge is scanned inward independently. A row counts as border when at
//! least 85% of its sampled pixels inside the current column range are light
//! (every RGB channel above 230), and likewise for columns. Scanning repeats
//! until no edge moves, so a second pass over the result finds nothing. The crop is committed only when it is significant (some edge
//! at least 2% of its dimension) and conservative (at least half of each
//! dimension survives), so legitimately pale designs are left alone.

use std::ops::Range;

use image::{DynamicImage, Rgba, RgbaImage};

/// Channel value above which a pixel counts as light.
pub const LIGHT_CHANNEL_THRESHOLD: u8 = 230;
/// Share of light samples that makes a line a border line.
pub const BORDER_LIGHT_FRACTION: f64 = 0.85;
/// Every n-th pixel along a line is sampled.
pub const SAMPLE_STEP: usize = 2;
/// Smallest border (per edge, relative to its dimension) worth cropping.
pub const MIN_BORDER_FRACTION: f64 = 0.02;
/// Smallest share of each dimension a crop must keep.
pub const MIN_KEEP_FRACTION: f64 = 0.5;

/// Pixel rectangle `[x, x + width) x [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Return the cropped image, or `None` when no border crop should be applied.
pub fn trim_light_border(img: &DynamicImage) -> Option<DynamicImage> {
    let rgba = img.to_rgba8();
    let rect = detect_light_border(&rgba)?;
    Some(img.crop_imm(rect.x, rect.y, rect.width, rect.height))
}

/// Find the crop rectangle that removes a light border, if one qualifies.
pub fn detect_light_border(img: &RgbaImage) -> Option<CropRect> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return None;
    }

    let (mut top, mut bottom, mut left, mut right) = (0, h, 0, w);
    loop {
        let before = (top, bottom, left, right);
        while top < bottom && row_is_border(img, top, left..right) {
            top += 1;
        }
        while bottom > top && row_is_border(img, bottom - 1, left..right) {
            bottom -= 1;
        }
        while left < right && column_is_border(img, left, top..bottom) {
            left += 1;
        }
        while right > left && column_is_border(img, right - 1, top..bottom) {
            right -= 1;
        }
        if (top, bottom, left, right) == before {
            break;
        }
    }

    let largest_vertical = top.max(h - bottom);
    let largest_horizontal = left.max(w - right);
    let significant = f64::from(largest_vertical) >= f64::from(h) * MIN_BORDER_FRACTION
        || f64::from(largest_horizontal) >= f64::from(w) * MIN_BORDER_FRACTION;
    if !significant || (largest_vertical == 0 && largest_horizontal == 0) {
        return None;
    }

    let width = right.saturating_sub(left);
    let height = bottom.saturating_sub(top);
    let keeps_enough = f64::from(width) >= f64::from(w) * MIN_KEEP_FRACTION
        && f64::from(height) >= f64::from(h) * MIN_KEEP_FRACTION;
    if !keeps_enough {
        return None;
    }

    Some(CropRect {
        x: left,
        y: top,
        width,
        height,
    })
}

fn is_light(pixel: &Rgba<u8>) -> bool {
    pixel.0[..3].iter().all(|&c| c > LIGHT_CHANNEL_THRESHOLD)
}

fn row_is_border(img: &RgbaImage, y: u32, columns: Range<u32>) -> bool {
    mostly_light(columns.step_by(SAMPLE_STEP).map(|x| img.get_pixel(x, y)))
}

fn column_is_border(img: &RgbaImage, x: u32, rows: Range<u32>) -> bool {
    mostly_light(rows.step_by(SAMPLE_STEP).map(|y| img.get_pixel(x, y)))
}

fn mostly_light<'a>(samples: impl Iterator<Item = &'a Rgba<u8>>) -> bool {
    let (light, total) = samples.fold((0usize, 0usize), |(light, total), px| {
        (light + usize::from(is_light(px)), total + 1)
    });
    total > 0 && light as f64 >= total as f64 * BORDER_LIGHT_FRACTION
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([250, 250, 250, 255]);
    const INK: Rgba<u8> = Rgba([30, 60, 120, 255]);

    /// `w x h` canvas of `INK` with a white frame of the given thickness per edge.
    fn framed(w: u32, h: u32, top: u32, right: u32, bottom: u32, left: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if y < top || y >= h - bottom || x < left || x >= w - right {
                WHITE
            } else if (x + y) % 7 == 0 {
                // sprinkle a few light pixels into the content
                WHITE
            } else {
                INK
            }
        })
    }

    #[test]
    fn crops_uniform_frame() {
        let img = framed(400, 300, 20, 20, 20, 20);
        let rect = detect_light_border(&img).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 20,
                y: 20,
                width: 360,
                height: 260
            }
        );
    }

    #[test]
    fn edges_advance_independently() {
        let img = framed(400, 300, 30, 0, 0, 12);
        let rect = detect_light_border(&img).unwrap();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (12, 30, 388, 270));
    }

    #[test]
    fn ignores_insignificant_border() {
        // 2px on a 400x300 canvas is below 2% of either dimension.
        let img = framed(400, 300, 2, 2, 2, 2);
        assert!(detect_light_border(&img).is_none());
    }

    #[test]
    fn refuses_to_crop_mostly_light_design() {
        // Content box is only 40% of the width.
        let img = framed(500, 400, 10, 150, 10, 150);
        assert!(detect_light_border(&img).is_none());
    }

    #[test]
    fn all_white_image_is_left_alone() {
        let img = RgbaImage::from_pixel(100, 100, WHITE);
        assert!(detect_light_border(&img).is_none());
    }

    #[test]
    fn no_border_means_no_crop() {
        let img = framed(200, 200, 0, 0, 0, 0);
        assert!(trim_light_border(&DynamicImage::ImageRgba8(img)).is_none());
    }

    #[test]
    fn trimming_is_idempotent() {
        let img = DynamicImage::ImageRgba8(framed(640, 480, 24, 31, 18, 40));
        let once = trim_light_border(&img).unwrap();
        assert_eq!((once.width(), once.height()), (569, 438));
        assert!(trim_light_border(&once).is_none());
    }

    #[test]
    fn border_hidden_behind_a_side_strip_is_found_in_one_pass() {
        // Light top band; a light left strip that is dark only beside a light
        // band of content. That band only reads as border once the strip is gone.
        let img = RgbaImage::from_fn(200, 200, |x, y| match (x < 32, y) {
            (_, 0..=19) => WHITE,
            (true, 20..=39) => INK,
            (true, _) => WHITE,
            (false, 20..=39) => WHITE,
            (false, _) => INK,
        });
        let rect = detect_light_border(&img).unwrap();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (32, 40, 168, 160));

        let once = trim_light_border(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!((once.width(), once.height()), (168, 160));
        assert!(trim_light_border(&once).is_none());
    }
}
