//! Map an arbitrary target canvas onto each provider's discrete size vocabulary.
//!
//! Every resolver is total: any width/height (including zero) yields a value
//! from the provider's accepted set. Output is later resampled to the exact
//! requested canvas by the post-processor.

use crate::canvas::aspect_ratio;
use crate::provider::ProviderKind;

/// OpenAI `gpt-image-1` accepted canvases.
pub const OPENAI_SIZES: &[&str] = &["1024x1024", "1536x1024", "1024x1536"];

/// Gemini `imageConfig.aspectRatio` enumeration.
pub const GEMINI_ASPECT_RATIOS: &[&str] = &[
    "1:1", "2:3", "3:2", "3:4", "4:3", "4:5", "5:4", "9:16", "16:9", "21:9",
];

/// Stability `aspect_ratio` enumeration.
pub const STABILITY_ASPECT_RATIOS: &[&str] = &[
    "21:9", "16:9", "3:2", "5:4", "1:1", "4:5", "2:3", "9:16", "9:21",
];

/// Provider-native size parameter for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderDimensions {
    /// A fixed pixel canvas such as `"1536x1024"`.
    Size(&'static str),
    /// An aspect ratio such as `"16:9"`.
    AspectRatio(&'static str),
}

impl ProviderDimensions {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Size(s) | Self::AspectRatio(s) => s,
        }
    }
}

/// Resolve the size parameter for `kind` given the requested canvas.
pub fn resolve_dimensions(kind: ProviderKind, width: u32, height: u32) -> ProviderDimensions {
    match kind {
        ProviderKind::OpenAi => ProviderDimensions::Size(openai_size(width, height)),
        ProviderKind::Gemini => {
            ProviderDimensions::AspectRatio(nearest_ratio(GEMINI_ASPECT_RATIOS, width, height))
        }
        ProviderKind::Stability => {
            ProviderDimensions::AspectRatio(nearest_ratio(STABILITY_ASPECT_RATIOS, width, height))
        }
    }
}

/// Three-way canvas pick: wide above 1.3, tall below 0.77, otherwise square.
pub fn openai_size(width: u32, height: u32) -> &'static str {
    let ratio = aspect_ratio(width, height);
    if ratio > 1.3 {
        "1536x1024"
    } else if ratio < 0.77 {
        "1024x1536"
    } else {
        "1024x1024"
    }
}

/// Pick the candidate closest in log-ratio space, so 2:1 and 1:2 are
/// treated symmetrically.
fn nearest_ratio(candidates: &'static [&'static str], width: u32, height: u32) -> &'static str {
    let target = aspect_ratio(width, height).ln();
    let mut best = candidates[0];
    let mut best_delta = f64::MAX;
    for &candidate in candidates {
        let Some(value) = parse_ratio(candidate) else {
            continue;
        };
        let delta = (value.ln() - target).abs();
        if delta < best_delta {
            best_delta = delta;
            best = candidate;
        }
    }
    best
}

fn parse_ratio(raw: &str) -> Option<f64> {
    let (w, h) = raw.split_once(':')?;
    let w: f64 = w.parse().ok()?;
    let h: f64 = h.parse().ok()?;
    (w > 0.0 && h > 0.0).then_some(w / h)
}
