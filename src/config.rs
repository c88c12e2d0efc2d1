use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Default port used by the analysis service when `SERVER_PORT` is unset.
pub const DEFAULT_SERVER_PORT: u16 = 5000;
/// Default ceiling on document length accepted by the sentence segmenter.
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 1_000_000;
/// Default base URL used by front-end clients to reach the analysis service.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
/// Default log file used when `DOCINSIGHT_LOG_FILE` is unset.
pub const DEFAULT_LOG_FILE: &str = "logs/docinsight.log";

// A character escaped as `\uXXXX` takes six bytes in a JSON body.
const MAX_JSON_BYTES_PER_CHAR: usize = 6;
const BODY_ENVELOPE_SLACK: usize = 64 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the document analysis service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface the HTTP server binds to.
    pub server_host: IpAddr,
    /// Port the HTTP server binds to.
    pub server_port: u16,
    /// Longest document (in characters) the segmenter will process.
    pub max_document_chars: usize,
    /// Base URL of the analysis service as seen by clients.
    pub api_url: String,
    /// File receiving a copy of the service logs.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: IpAddr::from([0, 0, 0, 0]),
            server_port: DEFAULT_SERVER_PORT,
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
            api_url: DEFAULT_API_URL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as absent so that an empty `.env` entry falls back to the
    /// documented default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            server_host: optional("SERVER_HOST")
                .map(|value| parse_value("SERVER_HOST", &value))
                .transpose()?
                .unwrap_or(defaults.server_host),
            server_port: optional("SERVER_PORT")
                .map(|value| parse_value("SERVER_PORT", &value))
                .transpose()?
                .unwrap_or(defaults.server_port),
            max_document_chars: optional("MAX_DOCUMENT_CHARS")
                .map(|value| parse_value::<usize>("MAX_DOCUMENT_CHARS", &value))
                .transpose()?
                .map(|limit| limit.max(1))
                .unwrap_or(defaults.max_document_chars),
            api_url: optional("ANALYZER_API_URL")
                .map(|value| value.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            log_file: optional("DOCINSIGHT_LOG_FILE")
                .map(|value| PathBuf::from(value.trim()))
                .unwrap_or(defaults.log_file),
        })
    }

    /// Largest request body the HTTP layer accepts.
    ///
    /// Any document within `max_document_chars` fits, however it is encoded, so length checks
    /// always happen in the segmenter rather than at the transport.
    pub fn max_body_bytes(&self) -> usize {
        self.max_document_chars
            .saturating_mul(MAX_JSON_BYTES_PER_CHAR)
            .saturating_add(BODY_ENVELOPE_SLACK)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        server_host = %config.server_host,
        server_port = config.server_port,
        max_document_chars = config.max_document_chars,
        api_url = %config.api_url,
        log_file = %config.log_file.display(),
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
