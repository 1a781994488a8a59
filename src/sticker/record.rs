use base64::Engine;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::style::StickerStyle;

/// MIME type assumed when the image service leaves it out.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Inline image payload returned by the image service.
///
/// `data` holds the base64 text exactly as received; it is only decoded when
/// the bytes are needed (export, download).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    pub data: String,
}

impl ImageData {
    /// A blank `mime_type` becomes [`DEFAULT_MIME_TYPE`], so every payload
    /// can be written out as a data URL and read back.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        let mime_type = if mime_type.trim().is_empty() {
            DEFAULT_MIME_TYPE.to_string()
        } else {
            mime_type
        };
        Self {
            mime_type,
            data: data.into(),
        }
    }

    /// Encodes raw bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(
            mime_type,
            base64::engine::general_purpose::STANDARD.encode(bytes),
        )
    }

    /// `data:<mime>;base64,<data>`, directly renderable by a browser.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Parses a base64 data URL. Returns `None` for anything else.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime_type, data) = rest.split_once(";base64,")?;
        if mime_type.is_empty() {
            return None;
        }
        Some(Self::new(mime_type, data))
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.data.trim())
    }
}

// Persisted as the data URL string so stored galleries stay renderable as-is.
impl Serialize for ImageData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for ImageData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let url = String::deserialize(deserializer)?;
        ImageData::from_data_url(&url)
            .ok_or_else(|| serde::de::Error::custom("expected a base64 data URL"))
    }
}

/// One generated sticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerRecord {
    pub id: String,
    #[serde(rename = "imageUrl")]
    pub image_data: ImageData,
    pub prompt: String,
    pub style: StickerStyle,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl StickerRecord {
    /// Builds a record for a freshly generated image with a new unique id.
    ///
    /// `created_at` is truncated to milliseconds, the precision it is stored with.
    pub fn new(image_data: ImageData, prompt: impl Into<String>, style: StickerStyle) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            image_data,
            prompt: prompt.into(),
            style,
            created_at: Utc::now().trunc_subsecs(3),
        }
    }
}

#[cfg(test)]
pub(crate) fn fixture(prompt: &str) -> StickerRecord {
    StickerRecord::new(
        ImageData::from_bytes("image/png", prompt.as_bytes()),
        prompt,
        StickerStyle::Cartoon,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_round_trip() {
        let image = ImageData::new("image/png", "aGVsbG8=");
        assert_eq!(image.to_data_url(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(ImageData::from_data_url(&image.to_data_url()), Some(image));
    }

    #[test]
    fn test_from_data_url_rejects_other_urls() {
        assert_eq!(ImageData::from_data_url("https://example.com/a.png"), None);
        assert_eq!(ImageData::from_data_url("data:image/png,raw"), None);
        assert_eq!(ImageData::from_data_url("data:;base64,aGVsbG8="), None);
    }

    #[test]
    fn test_blank_mime_type_still_round_trips() {
        for blank in ["", "  "] {
            let image = ImageData::new(blank, "aGVsbG8=");
            assert_eq!(image.mime_type, DEFAULT_MIME_TYPE);
            assert_eq!(ImageData::from_data_url(&image.to_data_url()), Some(image));
        }
    }

    #[test]
    fn test_decode_bytes() {
        let image = ImageData::from_bytes("image/jpeg", b"\x89PNG bytes");
        assert_eq!(image.decode().unwrap(), b"\x89PNG bytes");
        assert!(ImageData::new("image/png", "not base64!").decode().is_err());
    }

    #[test]
    fn test_new_records_get_distinct_ids() {
        let a = fixture("a");
        let b = fixture("a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_record_json_layout() {
        let record = fixture("a cyberpunk cat");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], record.id.as_str());
        assert_eq!(value["prompt"], "a cyberpunk cat");
        assert_eq!(value["style"], "cartoon");
        assert_eq!(value["imageUrl"], record.image_data.to_data_url().as_str());
        assert_eq!(value["createdAt"], record.created_at.timestamp_millis());
    }

    #[test]
    fn test_record_reads_saved_gallery_entry() {
        let json = r#"{
            "id": "lq2x9k3m8fz",
            "imageUrl": "data:image/png;base64,aGVsbG8=",
            "prompt": "A wise old owl reading a book",
            "style": "watercolor",
            "createdAt": 1718000000000
        }"#;
        let record: StickerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "lq2x9k3m8fz");
        assert_eq!(record.style, StickerStyle::Watercolor);
        assert_eq!(record.image_data.decode().unwrap(), b"hello");
        assert_eq!(record.created_at.timestamp_millis(), 1718000000000);
    }
}
