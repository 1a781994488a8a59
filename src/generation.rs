//! Remote image generation.
//!
//! - `types`: request/response shapes of the Gemini `generateContent` call.
//! - `client`: the `ImageGenerator` seam and its Gemini implementation.

pub mod client;
pub mod types;

pub use client::{GeminiClient, ImageGenerator, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use types::{extract_image, ImageExtraction};
