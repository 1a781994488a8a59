use serde::Deserialize;
use std::path::PathBuf;

/// Default number of seconds a generation may take before it is reported as failed.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default port of the local presentation API.
pub const DEFAULT_WEB_PORT: u16 = 8787;

/// Name of the application directory under the platform data directory.
pub const APP_DIR_NAME: &str = "stickerforge";

/// Environment variables consulted, in order, for the image service key.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Settings read from a TOML configuration file.
///
/// Every field is optional; anything missing falls back to the defaults and
/// anything given on the command line wins.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub web_port: Option<u16>,
    pub share_base_url: Option<String>,
}
