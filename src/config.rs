//! Environment-sourced server configuration.
//!
//! Configuration is read once at startup and passed explicitly into the
//! server state; nothing in the crate reads the environment after that.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY` — API credential (required; startup fails without it)
//! - `OPENAI_MODEL` — model identifier (default: "gpt-4o-mini")
//! - `OPENAI_BASE_URL` — completion API base URL override (optional)
//! - `PORT` — HTTP port (default: 5000)

use thiserror::Error;

/// Model used when `OPENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5000;

/// Startup configuration errors. All of these are fatal: the process must
/// refuse to start rather than run without a working credential or port.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The required API credential is absent.
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    /// `PORT` is present but not a valid port number.
    #[error("invalid PORT value '{value}': {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Credential for the completion API.
    pub api_key: String,
    /// Model identifier passed on every completion call.
    pub model: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Optional completion API base URL override.
    pub base_url: Option<String>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through a lookup function.
    ///
    /// Empty values are treated as unset, matching how an empty variable in
    /// a `.env` file behaves.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| get(key).filter(|value| !value.is_empty());

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let model = get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };
        let base_url = get("OPENAI_BASE_URL");

        Ok(Self {
            api_key,
            model,
            port,
            base_url,
        })
    }
}
