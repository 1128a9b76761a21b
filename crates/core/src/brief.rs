//! Design brief: the inbound request body and its validated form.
//!
//! [`VisualBriefInput`] mirrors the JSON the dashboard posts (every field
//! optional, camelCase). [`VisualBriefInput::validate`] turns it into a
//! [`VisualBrief`] with typed modes, a parsed canvas and blank strings dropped.

use serde::{Deserialize, Serialize};

use crate::canvas::CanvasSize;
use crate::error::CoreError;
use crate::provider::ProviderKind;

/// Brand colours beyond this count are ignored.
pub const MAX_BRAND_COLORS: usize = 6;

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Raw `POST /api/ai/visual` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualBriefInput {
    pub prompt: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub style: Option<String>,
    pub brand_colors: Option<Vec<String>>,
    pub hero_type: Option<String>,
    pub text_mode: Option<String>,
    pub brand_logo: Option<String>,
    pub brand_name: Option<String>,
    pub contact_info: Option<ContactInfo>,
    pub show_brand_name: Option<bool>,
    pub show_social_icons: Option<bool>,
    pub social_handles: Option<SocialHandles>,
    pub template_image_url: Option<String>,
    pub reference_image_url: Option<String>,
    pub logo_size_percent: Option<f64>,
    pub cta_text: Option<String>,
    pub edit_image_url: Option<String>,
    pub provider: Option<String>,
}

/// Contact details rendered on the design.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl ContactInfo {
    /// Labelled non-blank entries in render order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Phone", &self.phone),
            ("Email", &self.email),
            ("Website", &self.website),
            ("Address", &self.address),
        ]
        .into_iter()
        .filter_map(|(label, value)| non_blank(value.as_deref()).map(|v| (label, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Social network handles, keyed by network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialHandles {
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    #[serde(alias = "x")]
    pub twitter: Option<String>,
    pub tiktok: Option<String>,
    pub linkedin: Option<String>,
    pub youtube: Option<String>,
}

impl SocialHandles {
    /// `(network, handle)` pairs for every non-blank handle.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Instagram", &self.instagram),
            ("Facebook", &self.facebook),
            ("X", &self.twitter),
            ("TikTok", &self.tiktok),
            ("LinkedIn", &self.linkedin),
            ("YouTube", &self.youtube),
        ]
        .into_iter()
        .filter_map(|(network, value)| non_blank(value.as_deref()).map(|v| (network, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Validated brief
// ---------------------------------------------------------------------------

/// What the hero of the visual is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeroType {
    Person,
    #[default]
    Product,
    Typography,
}

impl HeroType {
    /// Unknown values fall back to [`HeroType::Product`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "person" | "people" | "model" => Self::Person,
            "typography" | "text" | "text-only" => Self::Typography,
            _ => Self::Product,
        }
    }
}

/// How the prompt text is turned into on-image copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextMode {
    /// Render the user's string exactly.
    #[default]
    Verbatim,
    /// Treat the string as a topic and let the model write the copy.
    Topic,
}

impl TextMode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "topic" | "ai" | "generate" => Self::Topic,
            _ => Self::Verbatim,
        }
    }
}

/// A user-supplied image steering the generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceImage {
    /// Preserve this exact subject and blend it into a new scene.
    SubjectPhoto(String),
    /// Imitate this image's layout.
    LayoutTemplate(String),
}

impl ReferenceImage {
    pub fn source(&self) -> &str {
        match self {
            Self::SubjectPhoto(src) | Self::LayoutTemplate(src) => src,
        }
    }
}

/// Brand assets attached to the brief.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrandKit {
    pub colors: Vec<String>,
    pub logo: Option<String>,
    pub name: Option<String>,
    pub show_name: bool,
}

impl BrandKit {
    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }
}

/// Validated design brief.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualBrief {
    pub prompt: String,
    pub category: String,
    pub size: CanvasSize,
    pub style: Option<String>,
    pub brand: BrandKit,
    pub hero: HeroType,
    pub text_mode: TextMode,
    pub cta_text: Option<String>,
    pub contact: ContactInfo,
    /// Present only when social icons are enabled and at least one handle is set.
    pub social: Option<SocialHandles>,
    pub reference: Option<ReferenceImage>,
    pub edit_image_url: Option<String>,
    pub logo_size_percent: Option<f64>,
    pub provider: ProviderKind,
}

impl VisualBriefInput {
    /// Check required fields and normalise everything else.
    pub fn validate(self) -> Result<VisualBrief, CoreError> {
        let prompt = non_blank_owned(self.prompt);
        let category = non_blank_owned(self.category);
        let size_raw = non_blank_owned(self.size);

        let missing: Vec<&str> = [
            ("prompt", prompt.is_none()),
            ("category", category.is_none()),
            ("size", size_raw.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        let (Some(prompt), Some(category), Some(size_raw)) = (prompt, category, size_raw) else {
            return Err(CoreError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        };

        let size = CanvasSize::parse(&size_raw)?;

        let provider = match non_blank(self.provider.as_deref()) {
            Some(raw) => ProviderKind::parse(raw)?,
            None => ProviderKind::default(),
        };

        let colors = self
            .brand_colors
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| non_blank_owned(Some(c)))
            .take(MAX_BRAND_COLORS)
            .collect();

        let name = non_blank_owned(self.brand_name);
        let brand = BrandKit {
            colors,
            logo: non_blank_owned(self.brand_logo),
            show_name: name.is_some() && self.show_brand_name.unwrap_or(true),
            name,
        };

        let social = self
            .social_handles
            .filter(|handles| !handles.is_empty())
            .filter(|_| self.show_social_icons.unwrap_or(true));

        let reference = match (
            non_blank_owned(self.reference_image_url),
            non_blank_owned(self.template_image_url),
        ) {
            (Some(photo), _) => Some(ReferenceImage::SubjectPhoto(photo)),
            (None, Some(template)) => Some(ReferenceImage::LayoutTemplate(template)),
            (None, None) => None,
        };

        Ok(VisualBrief {
            prompt,
            category,
            size,
            style: non_blank_owned(self.style),
            brand,
            hero: self.hero_type.as_deref().map(HeroType::parse).unwrap_or_default(),
            text_mode: self.text_mode.as_deref().map(TextMode::parse).unwrap_or_default(),
            cta_text: non_blank_owned(self.cta_text),
            contact: self.contact_info.unwrap_or_default(),
            social,
            reference,
            edit_image_url: non_blank_owned(self.edit_image_url),
            logo_size_percent: self.logo_size_percent.filter(|p| p.is_finite()),
            provider,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn non_blank_owned(value: Option<String>) -> Option<String> {
    non_blank(value.as_deref()).map(str::to_string)
}
