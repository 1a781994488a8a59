use async_trait::async_trait;
use log::{debug, error, info};

use crate::error_handling::types::GenerationError;
use crate::generation::types::{
    extract_image, remote_error_message, GenerateContentRequest, GenerateContentResponse,
    ImageExtraction,
};
use crate::sticker::ImageData;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Something that turns a composed prompt into an image.
///
/// One call is one remote round trip; implementations never retry.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, composed_prompt: &str) -> Result<ImageData, GenerationError>;
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    /// `api_key` is checked on every call, so a client built without one
    /// reports the missing credential each time instead of failing on the wire.
    pub fn new(api_key: Option<String>, endpoint: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(&self, composed_prompt: &str) -> Result<ImageData, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let url = self.request_url();
        debug!("POST {} ({} prompt chars)", url, composed_prompt.len());

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::sticker(composed_prompt))
            .send()
            .await
            .map_err(|e| {
                error!("Sticker generation request failed: {}", e);
                GenerationError::Network(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = remote_error_message(&body);
            error!("Image service error: {} - {}", status, message);
            return Err(GenerationError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse image service response: {}", e);
            GenerationError::InvalidResponse(e.to_string())
        })?;

        match extract_image(&parsed) {
            ImageExtraction::Found(image) => {
                info!(
                    "Received {} image ({} base64 chars)",
                    image.mime_type,
                    image.data.len()
                );
                Ok(image)
            }
            ImageExtraction::NoImage => {
                error!(
                    "Image service answered with {} candidates and no image",
                    parsed.candidates.len()
                );
                Err(GenerationError::EmptyResult)
            }
        }
    }
}
