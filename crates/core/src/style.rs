//! Photo style configuration.
//!
//! A closed set of presentation styles, each carrying the aspect ratio
//! passed to the image-generation backend and the hint text woven into
//! composed prompts. Consumed only when building prompts and image
//! requests; never mutated at runtime.

use serde::{Deserialize, Serialize};

pub const STYLE_RUSTIC_DARK: &str = "Rustic/Dark";
pub const STYLE_BRIGHT_MODERN: &str = "Bright/Modern";
pub const STYLE_SOCIAL_MEDIA: &str = "Social Media";

/// All valid style labels, in display order.
pub const VALID_STYLES: &[&str] = &[STYLE_RUSTIC_DARK, STYLE_BRIGHT_MODERN, STYLE_SOCIAL_MEDIA];

/// Visual style applied to a whole photo-shoot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoStyle {
    /// Moody, artisanal plating on dark wood.
    RusticDark,
    /// High-key minimalist plating in natural light.
    BrightModern,
    /// Top-down flat lay composed for feeds.
    SocialMedia,
}

impl PhotoStyle {
    /// Parse a style from its display label.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            STYLE_RUSTIC_DARK => Ok(Self::RusticDark),
            STYLE_BRIGHT_MODERN => Ok(Self::BrightModern),
            STYLE_SOCIAL_MEDIA => Ok(Self::SocialMedia),
            _ => Err(format!(
                "Invalid style '{s}'. Must be one of: {}",
                VALID_STYLES.join(", ")
            )),
        }
    }

    /// Display label, also used as the aesthetic name inside prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RusticDark => STYLE_RUSTIC_DARK,
            Self::BrightModern => STYLE_BRIGHT_MODERN,
            Self::SocialMedia => STYLE_SOCIAL_MEDIA,
        }
    }

    /// Aspect ratio requested from the image-generation backend.
    pub fn aspect_ratio(&self) -> &'static str {
        match self {
            Self::RusticDark => "4:3",
            Self::BrightModern => "1:1",
            Self::SocialMedia => "9:16",
        }
    }

    /// Style hint text incorporated into composed photography prompts.
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            Self::RusticDark => {
                "moody lighting, dark wood background, cast iron skillet, fresh herbs, \
                 slightly messy, artisanal feel, dramatic shadows, warm tones"
            }
            Self::BrightModern => {
                "bright, natural light, minimalist white plate, clean background, \
                 vibrant colors, precise plating, high-key photography, airy feel"
            }
            Self::SocialMedia => {
                "top-down flat lay, colorful background, props like cutlery and napkins, \
                 perfect for Instagram, engaging composition, lifestyle feel"
            }
        }
    }
}
