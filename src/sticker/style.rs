use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual style applied to a generated sticker.
///
/// The catalog is closed: a `StickerStyle` value is always one of the
/// entries below, so every style has a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StickerStyle {
    #[default]
    #[serde(rename = "cartoon")]
    Cartoon,
    #[serde(rename = "pixel-art")]
    PixelArt,
    #[serde(rename = "vector")]
    Vector,
    #[serde(rename = "watercolor")]
    Watercolor,
    #[serde(rename = "3d")]
    ThreeD,
    #[serde(rename = "holographic")]
    Holographic,
    #[serde(rename = "vintage")]
    Vintage,
    #[serde(rename = "kawaii")]
    Kawaii,
    #[serde(rename = "graffiti")]
    Graffiti,
}

impl StickerStyle {
    /// Every style, in catalog order.
    pub const ALL: [StickerStyle; 9] = [
        StickerStyle::Cartoon,
        StickerStyle::PixelArt,
        StickerStyle::Vector,
        StickerStyle::Watercolor,
        StickerStyle::ThreeD,
        StickerStyle::Holographic,
        StickerStyle::Vintage,
        StickerStyle::Kawaii,
        StickerStyle::Graffiti,
    ];

    /// Identifier used on the command line, in share links and on disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            StickerStyle::Cartoon => "cartoon",
            StickerStyle::PixelArt => "pixel-art",
            StickerStyle::Vector => "vector",
            StickerStyle::Watercolor => "watercolor",
            StickerStyle::ThreeD => "3d",
            StickerStyle::Holographic => "holographic",
            StickerStyle::Vintage => "vintage",
            StickerStyle::Kawaii => "kawaii",
            StickerStyle::Graffiti => "graffiti",
        }
    }

    /// Natural-language descriptor appended to the user's prompt.
    pub fn describe(&self) -> &'static str {
        match self {
            StickerStyle::Cartoon => {
                "clean flat vector cartoon style, thick outlines, vibrant pop colors, simple shading"
            }
            StickerStyle::PixelArt => {
                "authentic 8-bit pixel art, defined grid, limited color palette, retro game asset"
            }
            StickerStyle::Vector => {
                "professional vector illustration, adobe illustrator style, smooth curves, flat shading, minimal detail"
            }
            StickerStyle::Watercolor => {
                "watercolor illustration, artistic hand-painted look, soft blended edges inside the border"
            }
            StickerStyle::ThreeD => {
                "3D rendered character, blender cycles render, clay material, soft studio lighting, cute 3d toy"
            }
            StickerStyle::Holographic => {
                "holographic sticker effect, prismatic color gradients, metallic foil finish, shiny reflection"
            }
            StickerStyle::Vintage => {
                "retro 70s badge aesthetics, distressed texture, muted earth tones, vintage label"
            }
            StickerStyle::Kawaii => {
                "kawaii aesthetic, pastel colors, simple cute features, blush stickers, sanrio style"
            }
            StickerStyle::Graffiti => {
                "urban street art style, spray paint texture, drip effects, bold dynamic lines, wildstyle"
            }
        }
    }
}

impl fmt::Display for StickerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no style in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyle(pub String);

impl fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = StickerStyle::ALL.iter().map(|s| s.as_str()).collect();
        write!(
            f,
            "unknown sticker style '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownStyle {}

impl FromStr for StickerStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StickerStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}
