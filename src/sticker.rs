//! Sticker domain types.
//!
//! - `style`: the closed catalog of visual styles and their descriptors.
//! - `prompt`: builds the instruction text sent to the image service.
//! - `record`: generated sticker records and their inline image payload.

pub mod prompt;
pub mod record;
pub mod style;

pub use prompt::compose;
pub use record::{ImageData, StickerRecord};
pub use style::StickerStyle;
