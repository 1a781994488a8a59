use super::types::*;
use crate::error_handling::types::ConfigError;
use crate::generation::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use clap::Args;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command-line settings shared by every subcommand.
///
/// Each flag also reads an environment variable through clap's `env`
/// support. Flags left unset fall back to the configuration file given with
/// `--config`, then to built-in defaults.
///
/// # Fields Overview
///
/// - `config`: optional TOML file with the same settings
/// - `data_dir`: directory holding the persisted sticker gallery
/// - `endpoint`: base URL of the image service
/// - `model`: image model name
/// - `timeout_secs`: how long a generation may take, `0` disables the limit
/// - `port`: port of the local presentation API
/// - `share_base_url`: page that share links point at
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "STICKERFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory where stickers are stored
    #[arg(long, global = true, env = "STICKERFORGE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the image generation service
    #[arg(long, global = true, env = "STICKERFORGE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Image generation model
    #[arg(long, global = true, env = "STICKERFORGE_MODEL")]
    pub model: Option<String>,

    /// Seconds to wait for a sticker before giving up (0 waits forever)
    #[arg(long, global = true, env = "STICKERFORGE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Port of the local HTTP API started by `serve`
    #[arg(long, global = true, env = "STICKERFORGE_PORT")]
    pub port: Option<u16>,

    /// Page that share links point at
    #[arg(long, global = true, env = "STICKERFORGE_SHARE_URL")]
    pub share_base_url: Option<String>,
}

/// Resolved runtime configuration.
///
/// Built once at startup by [`Config::resolve`]; the image service key is
/// read from the environment at that moment and never again.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub endpoint: String,
    pub model: String,
    pub request_timeout: Option<Duration>,
    pub web_port: u16,
    pub share_base_url: String,
    pub api_key: Option<String>,
}

// Hand-written so the key never ends up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &self.data_dir)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .field("web_port", &self.web_port)
            .field("share_base_url", &self.share_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Reads a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<FileConfig, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::DirectoryDoesNotExist(format!(
                "configuration file {} not found",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    /// Layers defaults, the optional file and the command line, then reads
    /// the API key from the environment.
    pub fn resolve(args: &ConfigArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => {
                info!("Reading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => FileConfig::default(),
        };
        Self::build(args, file, read_api_key())
    }

    pub(crate) fn build(
        args: &ConfigArgs,
        file: FileConfig,
        api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = match args.data_dir.clone().or(file.data_dir) {
            Some(dir) => dir,
            None => dirs::data_dir()
                .map(|p| p.join(APP_DIR_NAME))
                .ok_or(ConfigError::NoDataDirectory)?,
        };

        let endpoint = args
            .endpoint
            .clone()
            .or(file.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        validate_http_url(&endpoint)?;

        let model = args
            .model
            .clone()
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() || model.contains('/') {
            return Err(ConfigError::NotInRange(format!(
                "model name {:?} is not valid",
                model
            )));
        }

        let timeout_secs = args
            .timeout_secs
            .or(file.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs > 3600 {
            return Err(ConfigError::NotInRange(format!(
                "request timeout of {}s exceeds one hour",
                timeout_secs
            )));
        }
        let request_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let web_port = args.port.or(file.web_port).unwrap_or(DEFAULT_WEB_PORT);
        if web_port < 1024 {
            return Err(ConfigError::NotInRange(format!(
                "web port {} is reserved, use 1024-65535",
                web_port
            )));
        }

        let share_base_url = args
            .share_base_url
            .clone()
            .or(file.share_base_url)
            .unwrap_or_else(|| format!("http://127.0.0.1:{}/", web_port));
        validate_http_url(&share_base_url)?;

        let config = Config {
            data_dir,
            endpoint,
            model,
            request_timeout,
            web_port,
            share_base_url,
            api_key,
        };
        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}

/// First non-empty value among [`API_KEY_VARS`].
pub fn read_api_key() -> Option<String> {
    API_KEY_VARS.iter().find_map(|var| {
        std::env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

fn validate_http_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidEndpoint(format!(
            "{}: unsupported scheme {}",
            raw, other
        ))),
    }
}
