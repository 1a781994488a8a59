//! Prompt templates sent to the image service.

use super::style::StickerStyle;
use rand::seq::SliceRandom;

/// Example prompts offered when the user asks for inspiration.
pub const SUGGESTIONS: [&str; 6] = [
    "A cyberpunk cat wearing sunglasses",
    "A happy slice of pizza surfing",
    "A magical potion bottle with glowing liquid",
    "A retro robot holding a flower",
    "A cute astronaut floating in space donuts",
    "A wise old owl reading a book",
];

/// Builds the full instruction for one sticker.
///
/// The border and background requirements keep every sticker usable on
/// arbitrary backgrounds, so they are part of every request regardless of
/// style.
pub fn compose(user_prompt: &str, style: StickerStyle) -> String {
    format!(
        "Create a single, isolated die-cut sticker design of {prompt}.
Style: {style}.

CRITICAL DESIGN REQUIREMENTS:
1. The subject MUST be surrounded by a wide, solid white border (contour).
2. The background MUST be a solid, flat black color (#000000) for high contrast.
3. The image should be centered with breathing room around the edges.
4. NO text, NO watermarks, NO cropped edges.
5. High resolution, vector-like clarity.
",
        prompt = user_prompt,
        style = style.describe(),
    )
}

/// Picks one of [`SUGGESTIONS`] at random.
pub fn random_suggestion() -> &'static str {
    SUGGESTIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(SUGGESTIONS[0])
}
