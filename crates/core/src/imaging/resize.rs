//! Fill-resize provider output to the requested canvas.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::canvas::CanvasSize;

/// Resample `img` to exactly `target`, ignoring aspect ratio.
///
/// Returns the image unchanged (and `false`) when it already has the target
/// dimensions. The composer told the model the target shape, so a hard fill
/// is expected to be close to lossless in layout terms.
pub fn resize_to_target(img: DynamicImage, target: CanvasSize) -> (DynamicImage, bool) {
    if img.width() == target.width && img.height() == target.height {
        return (img, false);
    }
    (
        img.resize_exact(target.width, target.height, FilterType::Lanczos3),
        true,
    )
}
