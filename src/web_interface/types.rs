use serde::{Deserialize, Serialize};

use crate::controller::Controller;
use crate::session_management::GenerationStatus;
use crate::sticker::{StickerRecord, StickerStyle};

/// API error payload
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Snapshot of the generation session as seen by a client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub status: GenerationStatus,
    pub displayed_sticker: Option<StickerRecord>,
    pub error_message: Option<String>,
}

impl SessionResponse {
    pub fn from_controller(controller: &Controller) -> Self {
        Self {
            status: controller.status(),
            displayed_sticker: controller.displayed_sticker().cloned(),
            error_message: controller.error_message().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StyleResponse {
    pub id: StickerStyle,
    pub description: &'static str,
}

impl From<StickerStyle> for StyleResponse {
    fn from(style: StickerStyle) -> Self {
        Self {
            id: style,
            description: style.describe(),
        }
    }
}

/// Body of `POST /session/submit`. The style defaults to the catalog default.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub prompt: String,
    #[serde(default)]
    pub style: StickerStyle,
}
