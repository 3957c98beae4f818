//! Error types for tornboard

use thiserror::Error;

/// Result type alias for tornboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the library and CLI
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Crawler(#[from] CrawlerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Upstream error codes that mean the caller's key is unusable.
const INVALID_KEY_CODES: [u16; 5] = [1, 2, 10, 13, 18];

/// Upstream error codes for request throttling (per-minute and daily).
const RATE_LIMIT_CODES: [u16; 2] = [5, 14];

/// Upstream error codes for an id that does not resolve to an entity.
const INCORRECT_ID_CODES: [u16; 2] = [6, 7];

/// Errors raised while talking to the Torn API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport succeeded but the HTTP status was not 2xx.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// The API answered with its own `{error: {code, error}}` envelope.
    #[error("{message}")]
    Upstream { code: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Request queue shut down before the call completed")]
    QueueClosed,
}

impl ApiError {
    /// Upstream code, if this is an upstream rejection.
    pub fn upstream_code(&self) -> Option<u16> {
        match self {
            ApiError::Upstream { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_invalid_key(&self) -> bool {
        self.upstream_code()
            .is_some_and(|c| INVALID_KEY_CODES.contains(&c))
    }

    pub fn is_rate_limited(&self) -> bool {
        self.upstream_code()
            .is_some_and(|c| RATE_LIMIT_CODES.contains(&c))
    }

    pub fn is_incorrect_id(&self) -> bool {
        self.upstream_code()
            .is_some_and(|c| INCORRECT_ID_CODES.contains(&c))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest puts the full URL (including `key=`) in its Display output
        let err = err.without_url();
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl Error {
    /// The API error behind this error, if any.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors from the SQLite-backed stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Could not determine a home or data directory")]
    NoHome,

    #[error("Failed to encode stored value: {0}")]
    Encode(String),

    #[error("State store lock poisoned")]
    Poisoned,
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `tornboard init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("API key not configured. Run `tornboard init` or set TORNBOARD_API_KEY.")]
    MissingApiKey,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Crawler control errors
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Invalid crawler configuration: {0}")]
    InvalidConfig(String),

    #[error("Crawler is already running")]
    AlreadyRunning,

    #[error("No API key available for the crawler")]
    MissingCredential,
}
