use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    NoDataDirectory,
    DirectoryDoesNotExist(String),
    NotInRange(String),
    InvalidEndpoint(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::NoDataDirectory => {
                write!(f, "Could not determine a data directory, pass --data-dir")
            }
            ConfigError::DirectoryDoesNotExist(e) => write!(f, "Directory error: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
            ConfigError::InvalidEndpoint(e) => write!(f, "Invalid endpoint: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug, PartialEq)]
pub enum StorageError {
    WriteFailed,
    ReadFailed,
    QuotaExceeded { key: String, size: usize, quota: usize },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::WriteFailed => write!(f, "Storage write failed"),
            StorageError::ReadFailed => write!(f, "Storage read failed"),
            StorageError::QuotaExceeded { key, size, quota } => write!(
                f,
                "Storage quota exceeded writing '{}' ({} bytes, quota {} bytes)",
                key, size, quota
            ),
        }
    }
}

impl std::error::Error for StorageError {}

/// Failures of a single generation attempt.
///
/// Every variant ends up as the session's error message, so the `Display`
/// output is what the user reads.
#[derive(Debug)]
pub enum GenerationError {
    MissingCredential,
    Network(reqwest::Error),
    Remote { status: u16, message: String },
    InvalidResponse(String),
    EmptyResult,
    Timeout(Duration),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::MissingCredential => write!(
                f,
                "API key is missing. Set GEMINI_API_KEY (or API_KEY) before generating stickers."
            ),
            GenerationError::Network(e) => write!(f, "{}", e),
            GenerationError::Remote { status, message } => {
                write!(f, "Image service returned {}: {}", status, message)
            }
            GenerationError::InvalidResponse(e) => {
                write!(f, "Could not read the image service response: {}", e)
            }
            GenerationError::EmptyResult => write!(f, "No image data found in the response."),
            GenerationError::Timeout(after) => write!(
                f,
                "Sticker generation timed out after {} seconds",
                after.as_secs()
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Network(err)
    }
}

#[derive(Debug)]
pub enum ExportError {
    IoError(std::io::Error),
    DecodeFailed(String),
    InvalidLink(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::IoError(e) => write!(f, "Export IO error: {}", e),
            ExportError::DecodeFailed(e) => write!(f, "Image data could not be decoded: {}", e),
            ExportError::InvalidLink(e) => write!(f, "Invalid share link: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

#[derive(Debug)]
pub enum ControllerError {
    StorageError(StorageError),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::StorageError(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<StorageError> for ControllerError {
    fn from(err: StorageError) -> Self {
        ControllerError::StorageError(err)
    }
}
