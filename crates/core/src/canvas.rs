//! Target canvas size and its aspect-ratio classification.

use serde::Serialize;

use crate::error::CoreError;

/// Smallest accepted canvas side in pixels.
pub const MIN_CANVAS_SIDE: u32 = 64;
/// Largest accepted canvas side in pixels.
pub const MAX_CANVAS_SIDE: u32 = 4096;

/// Requested output canvas in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse a `"WxH"` size string (`x`, `X` or `×` separator).
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized = raw.trim().to_ascii_lowercase().replace('×', "x");
        let (w, h) = normalized.split_once('x').ok_or_else(|| {
            CoreError::Validation(format!("Invalid size '{raw}'. Expected WIDTHxHEIGHT"))
        })?;

        let parse_side = |side: &str| -> Result<u32, CoreError> {
            let value: u32 = side.trim().parse().map_err(|_| {
                CoreError::Validation(format!("Invalid size '{raw}'. Expected WIDTHxHEIGHT"))
            })?;
            if !(MIN_CANVAS_SIDE..=MAX_CANVAS_SIDE).contains(&value) {
                return Err(CoreError::Validation(format!(
                    "Size sides must be between {MIN_CANVAS_SIDE} and {MAX_CANVAS_SIDE} pixels, got {value}"
                )));
            }
            Ok(value)
        };

        Ok(Self {
            width: parse_side(w)?,
            height: parse_side(h)?,
        })
    }

    /// Width divided by height.
    pub fn ratio(self) -> f64 {
        aspect_ratio(self.width, self.height)
    }

    /// `sqrt(width * height)`, the reference length for text and icon sizing.
    pub fn scale(self) -> f64 {
        (f64::from(self.width) * f64::from(self.height)).sqrt()
    }

    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    pub fn bucket(self) -> AspectBucket {
        AspectBucket::classify(self.width, self.height)
    }
}

impl std::fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Width/height ratio; degenerate inputs are treated as square.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    if width == 0 || height == 0 {
        return 1.0;
    }
    f64::from(width) / f64::from(height)
}

/// Five-way layout classification of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectBucket {
    /// ratio > 1.7 (e.g. 1920x600 web banners).
    WideBanner,
    /// 1.2 < ratio <= 1.7.
    Landscape,
    /// 0.85 < ratio <= 1.2.
    Square,
    /// 0.6 < ratio <= 0.85.
    Portrait,
    /// ratio <= 0.6 (stories, reels).
    Tall,
}

impl AspectBucket {
    pub fn classify(width: u32, height: u32) -> Self {
        let ratio = aspect_ratio(width, height);
        if ratio > 1.7 {
            Self::WideBanner
        } else if ratio > 1.2 {
            Self::Landscape
        } else if ratio > 0.85 {
            Self::Square
        } else if ratio > 0.6 {
            Self::Portrait
        } else {
            Self::Tall
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::WideBanner => "wide banner",
            Self::Landscape => "landscape",
            Self::Square => "square",
            Self::Portrait => "portrait",
            Self::Tall => "tall vertical",
        }
    }
}
