//! Side channels for a single sticker: saving it as a file and sharing it.
//!
//! Nothing here touches the gallery or the session; failures are returned to
//! the caller to report.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};
use url::Url;

use crate::error_handling::types::ExportError;
use crate::sticker::{StickerRecord, StickerStyle};

/// File extension for an image MIME type, `png` when unknown.
pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first().copied())
            .unwrap_or("png"),
    }
}

/// `stickr-<id>.<ext>`
pub fn download_file_name(record: &StickerRecord) -> String {
    format!(
        "stickr-{}.{}",
        record.id,
        extension_for(&record.image_data.mime_type)
    )
}

/// Writes the decoded image into `dir` and returns the file's path.
pub fn export_to_dir(record: &StickerRecord, dir: &Path) -> Result<PathBuf, ExportError> {
    let bytes = record
        .image_data
        .decode()
        .map_err(|e| ExportError::DecodeFailed(e.to_string()))?;
    fs::create_dir_all(dir).map_err(|e| {
        error!("Failed to create export dir {}: {}", dir.display(), e);
        ExportError::IoError(e)
    })?;
    let path = dir.join(download_file_name(record));
    fs::write(&path, &bytes).map_err(|e| {
        error!("Failed to write {}: {}", path.display(), e);
        ExportError::IoError(e)
    })?;
    info!("Exported sticker {} to {}", record.id, path.display());
    Ok(path)
}

pub fn share_text(record: &StickerRecord) -> String {
    format!("Check out this sticker I made! Prompt: \"{}\"", record.prompt)
}

/// Link that reopens the generator prefilled with the sticker's prompt and style.
pub fn share_link(base_url: &str, record: &StickerRecord) -> Result<String, ExportError> {
    let mut url = Url::parse(base_url).map_err(|e| ExportError::InvalidLink(e.to_string()))?;
    url.query_pairs_mut()
        .clear()
        .append_pair("prompt", &record.prompt)
        .append_pair("style", record.style.as_str());
    Ok(url.into())
}

/// Prompt and style carried by a share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePrefill {
    pub prompt: String,
    pub style: StickerStyle,
}

/// Reads a share link back. A missing prompt is empty and a missing or
/// unknown style falls back to the default style.
pub fn parse_share_link(link: &str) -> Result<SharePrefill, ExportError> {
    let url = Url::parse(link).map_err(|e| ExportError::InvalidLink(e.to_string()))?;
    let mut prefill = SharePrefill {
        prompt: String::new(),
        style: StickerStyle::default(),
    };
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "prompt" => prefill.prompt = value.into_owned(),
            "style" => prefill.style = value.parse().unwrap_or_default(),
            _ => {}
        }
    }
    Ok(prefill)
}
