//! Prompt composer: turns a validated brief into the instruction string sent
//! to the image model.
//!
//! Pure and deterministic. The output is a sequence of labelled blocks
//! (`LAYOUT:`, `BRAND:`, `TEXT CONTENT:` ...) separated by blank lines so the
//! model and humans reading logs can tell the constraints apart.

use crate::brief::{HeroType, ReferenceImage, TextMode, VisualBrief};
use crate::canvas::{AspectBucket, CanvasSize};

/// Fraction of each canvas side reserved for the composited logo.
pub const LOGO_ZONE_PERCENT: u32 = 15;

/// Contact/social icon size relative to `sqrt(width * height)`.
const ICON_SCALE: f64 = 0.035;
/// Contact/social text height relative to `sqrt(width * height)`.
const TEXT_SCALE: f64 = 0.022;
const MIN_ICON_PX: u32 = 16;
const MIN_TEXT_PX: u32 = 12;

/// Everything the composer needs beyond the brief itself.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub brief: &'a VisualBrief,
    /// Result of the vision check: the supplied logo already shows the brand
    /// name. Ignored when no logo is present.
    pub brand_name_in_logo: bool,
}

/// Build the full generation prompt.
pub fn compose_prompt(ctx: &PromptContext<'_>) -> String {
    let brief = ctx.brief;
    let mut blocks: Vec<String> = Vec::new();

    if let Some(reference) = &brief.reference {
        blocks.push(reference_block(reference));
    }
    blocks.push(design_block(brief));
    blocks.push(layout_block(brief.size));
    blocks.push(hero_block(brief));
    blocks.push(brand_block(brief, ctx.brand_name_in_logo));
    blocks.push(text_block(brief));
    if let Some(block) = contact_block(brief) {
        blocks.push(block);
    }
    if let Some(block) = social_block(brief) {
        blocks.push(block);
    }
    blocks.push(quality_block(brief.size));

    blocks.join("\n\n")
}

/// Short instruction for editing an existing design in place.
pub fn compose_edit_prompt(instruction: &str, canvas: CanvasSize) -> String {
    format!(
        "EDIT REQUEST: Edit the provided image. Apply only this change: \"{}\".\n\
         Keep everything else identical: layout, wording, colours, people, products and logo position.\n\
         Output the complete {canvas} design, full-bleed, with no added borders or frames.",
        instruction.trim()
    )
}

/// Pixel sizes for contact/social icons and text: `(icon_px, text_px)`.
pub fn contact_sizing(canvas: CanvasSize) -> (u32, u32) {
    let scale = canvas.scale();
    let icon = ((scale * ICON_SCALE).round() as u32).max(MIN_ICON_PX);
    let text = ((scale * TEXT_SCALE).round() as u32).max(MIN_TEXT_PX);
    (icon, text)
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

fn reference_block(reference: &ReferenceImage) -> String {
    match reference {
        ReferenceImage::SubjectPhoto(_) => "REFERENCE PHOTO: The attached image is the user's own photo. \
             Preserve this exact subject: same face, body, product shape, colours and details. \
             Do not redraw, restyle or replace it. Cut it out cleanly and blend it into a new \
             background and layout that follow the brief below, with matching light and shadows."
            .to_string(),
        ReferenceImage::LayoutTemplate(_) => "LAYOUT TEMPLATE: The attached image is a design template. \
             Use it as a layout template to imitate: follow its composition, block structure, \
             text hierarchy and spacing, but replace all of its text, imagery and colours with \
             the content of this brief. Do not copy any of its words or logos."
            .to_string(),
    }
}

fn design_block(brief: &VisualBrief) -> String {
    let mut lines = vec![
        "DESIGN BRIEF:".to_string(),
        format!(
            "Create a professional {} marketing visual.",
            brief.category.to_lowercase()
        ),
        format!(
            "Canvas: {} pixels ({} format).",
            brief.size,
            brief.size.bucket().label()
        ),
    ];
    if let Some(style) = &brief.style {
        lines.push(format!("Visual style: {style}."));
    }
    lines.join("\n")
}

fn layout_block(size: CanvasSize) -> String {
    let guidance = match size.bucket() {
        AspectBucket::WideBanner => {
            "Wide banner composition. Arrange content in a left-to-right flow: headline block \
             on one side, hero visual on the other. Keep all text inside the vertical middle 80% \
             and never stack more than two lines of text."
        }
        AspectBucket::Landscape => {
            "Landscape composition. Use a two-column, rule-of-thirds layout: the hero visual \
             takes roughly 55-60% of the width, the text block sits in the remaining space."
        }
        AspectBucket::Square => {
            "Square composition for social feeds. Centre the hero visual with the headline \
             above or below it and keep margins of at least 5% on every side."
        }
        AspectBucket::Portrait => {
            "Portrait composition. Stack content vertically: headline in the upper third, hero \
             visual in the middle, supporting text and call to action in the lower third."
        }
        AspectBucket::Tall => {
            "Tall vertical composition for stories and reels. Keep the top 12% and bottom 15% \
             free of important text because platform controls cover them. Stack headline, hero \
             visual and call to action in the central safe area."
        }
    };
    format!("LAYOUT:\n{guidance}")
}

fn hero_block(brief: &VisualBrief) -> String {
    let line = if matches!(brief.reference, Some(ReferenceImage::SubjectPhoto(_))) {
        "The hero is the subject from the reference photo, kept exactly as supplied."
    } else {
        match brief.hero {
            HeroType::Person => {
                "The hero is a person: an authentic-looking human subject relevant to the \
                 message, with realistic anatomy, hands and facial features."
            }
            HeroType::Product => {
                "The hero is the product: large, sharp and attractive, with studio-quality \
                 lighting and a clean background that makes it stand out."
            }
            HeroType::Typography => {
                "Typography-led design with no photographic hero. The headline itself is the \
                 main visual element, set in bold expressive type with supporting graphic shapes."
            }
        }
    };
    format!("HERO:\n{line}")
}

fn brand_block(brief: &VisualBrief, brand_name_in_logo: bool) -> String {
    let brand = &brief.brand;
    let mut lines = vec!["BRAND:".to_string()];

    if brand.colors.is_empty() {
        lines.push(
            "No brand palette supplied; choose colours that suit the category and style."
                .to_string(),
        );
    } else {
        lines.push(format!(
            "Brand colours: {}. Use them as the dominant palette.",
            brand.colors.join(", ")
        ));
    }

    if brand.has_logo() {
        lines.push(format!(
            "LOGO ZONE: The top-left corner (the first {LOGO_ZONE_PERCENT}% of the width and \
             {LOGO_ZONE_PERCENT}% of the height) is reserved for the brand logo, which will be \
             added afterwards. Keep that area visually quiet: no text, no icons, no faces and \
             no key product details there. Do not draw any logo yourself."
        ));
    }

    match (&brand.name, brand.show_name) {
        (Some(name), true) if brand.has_logo() && brand_name_in_logo => {
            lines.push(format!(
                "Do not write the brand name \"{name}\" as text; the logo already contains it."
            ));
        }
        (Some(name), true) if brand.has_logo() => {
            lines.push(format!(
                "Write the brand name \"{name}\" once as clean text, placed away from the \
                 top-left logo zone, for example bottom-right or beside the headline."
            ));
        }
        (Some(name), true) => {
            lines.push(format!(
                "Write the brand name \"{name}\" once as clean text where it reads naturally \
                 as a brand signature."
            ));
        }
        _ if !brand.has_logo() => {
            lines.push("Do not invent a brand name or logo.".to_string());
        }
        _ => {}
    }

    lines.join("\n")
}

fn text_block(brief: &VisualBrief) -> String {
    let mut lines = vec!["TEXT CONTENT:".to_string()];
    match brief.text_mode {
        TextMode::Verbatim => lines.push(format!(
            "Render exactly this text, character for character, with correct spelling: \"{}\". \
             Do not add, remove, translate or paraphrase words. You may split it into a \
             headline and a sub-line at natural breaks.",
            brief.prompt
        )),
        TextMode::Topic => lines.push(format!(
            "The following is a topic, not final copy: \"{}\". Write short, original \
             advertising copy about it: one punchy headline of at most 6 words and optionally \
             one supporting line of at most 12 words. Spell every word correctly.",
            brief.prompt
        )),
    }
    if let Some(cta) = &brief.cta_text {
        lines.push(format!(
            "Include a call-to-action button reading exactly \"{cta}\"."
        ));
    }
    if brief.brand.has_logo() {
        lines.push("Never place any text inside the top-left logo zone.".to_string());
    }
    lines.join("\n")
}

fn contact_block(brief: &VisualBrief) -> Option<String> {
    let entries = brief.contact.entries();
    if entries.is_empty() {
        return None;
    }
    let (icon, text) = contact_sizing(brief.size);
    let details = entries
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("; ");
    Some(format!(
        "CONTACT INFO:\nShow these contact details in a tidy strip near the bottom edge, each \
         with a small matching icon about {icon}px wide and text about {text}px high: {details}."
    ))
}

fn social_block(brief: &VisualBrief) -> Option<String> {
    let handles = brief.social.as_ref()?;
    let entries = handles.entries();
    if entries.is_empty() {
        return None;
    }
    let (icon, text) = contact_sizing(brief.size);
    let listed = entries
        .iter()
        .map(|(network, handle)| format!("{network} {handle}"))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "SOCIAL MEDIA:\nShow these handles with recognisable platform icons about {icon}px wide \
         and handle text about {text}px high, grouped together near the bottom edge: {listed}."
    ))
}

fn quality_block(size: CanvasSize) -> String {
    format!(
        "QUALITY RULES:\nFull-bleed design that fills the entire {size} canvas edge to edge: no \
         borders, frames, white margins or mock-up presentation. All text must be sharp, legible \
         and correctly spelled. No watermarks and no placeholder text."
    )
}
