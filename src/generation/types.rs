use serde::{Deserialize, Serialize};

use crate::sticker::ImageData;

/// Aspect ratio requested for every sticker.
pub const STICKER_ASPECT_RATIO: &str = "1:1";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub image_config: ImageConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

impl GenerateContentRequest {
    /// A single-part text request with the square output constraint.
    pub fn sticker(composed_prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: composed_prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                image_config: ImageConfig {
                    aspect_ratio: STICKER_ASPECT_RATIO.to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    /// Absent when the candidate was blocked.
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content part of a candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct InlineData {
    #[serde(default, rename = "mimeType", alias = "mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

/// Outcome of scanning a response for an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageExtraction {
    Found(ImageData),
    NoImage,
}

/// Returns the first inline image across all candidates, in order.
///
/// Parts with an empty payload are skipped.
pub fn extract_image(response: &GenerateContentResponse) -> ImageExtraction {
    let found = response
        .candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .find_map(|part| match part {
            Part::InlineData { inline_data } if !inline_data.data.is_empty() => {
                Some(ImageData::new(
                    inline_data.mime_type.as_str(),
                    inline_data.data.as_str(),
                ))
            }
            _ => None,
        });
    match found {
        Some(image) => ImageExtraction::Found(image),
        None => ImageExtraction::NoImage,
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: RemoteError,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Human-readable message from a failed call's body, or the body itself.
pub fn remote_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => match envelope.error.status {
            Some(status) => format!("{} ({})", envelope.error.message, status),
            None => envelope.error.message,
        },
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let value = serde_json::to_value(GenerateContentRequest::sticker("draw it")).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "draw it");
        assert_eq!(value["generationConfig"]["imageConfig"]["aspectRatio"], "1:1");
    }

    #[test]
    fn test_first_image_wins() {
        let response = parse(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "here you go"}]}},
                {"content": {"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "Zmlyc3Q="}},
                    {"inlineData": {"mimeType": "image/jpeg", "data": "c2Vjb25k"}}
                ]}}
            ]}"#,
        );
        assert_eq!(
            extract_image(&response),
            ImageExtraction::Found(ImageData::new("image/png", "Zmlyc3Q="))
        );
    }

    #[test]
    fn test_empty_payload_is_skipped() {
        let response = parse(
            r#"{"candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": ""}},
                {"inline_data": {"mime_type": "image/webp", "data": "d2VicA=="}}
            ]}}]}"#,
        );
        assert_eq!(
            extract_image(&response),
            ImageExtraction::Found(ImageData::new("image/webp", "d2VicA=="))
        );
    }

    #[test]
    fn test_missing_mime_type_defaults_to_png() {
        let response = parse(
            r#"{"candidates": [{"content": {"parts": [{"inlineData": {"data": "aGVsbG8="}}]}}]}"#,
        );
        match extract_image(&response) {
            ImageExtraction::Found(image) => {
                assert_eq!(image.mime_type, "image/png");
                assert_eq!(image.to_data_url(), "data:image/png;base64,aGVsbG8=");
            }
            other => panic!("expected an image, got {:?}", other),
        }
    }

    #[test]
    fn test_no_image_outcomes() {
        assert_eq!(extract_image(&parse("{}")), ImageExtraction::NoImage);
        assert_eq!(
            extract_image(&parse(r#"{"candidates": []}"#)),
            ImageExtraction::NoImage
        );
        assert_eq!(
            extract_image(&parse(
                r#"{"candidates": [{"finishReason": "SAFETY"}, {"content": {"parts": [{"text": "no"}, {"functionCall": {}}]}}]}"#
            )),
            ImageExtraction::NoImage
        );
    }

    #[test]
    fn test_remote_error_message() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}}"#;
        assert_eq!(
            remote_error_message(body),
            "API key not valid. (PERMISSION_DENIED)"
        );
        assert_eq!(remote_error_message("upstream timeout\n"), "upstream timeout");
        assert_eq!(remote_error_message(""), "empty response body");
    }
}
