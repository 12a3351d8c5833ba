//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Directory holding the persisted session (user, favorites, catalog).
    pub data_dir: PathBuf,
    pub openai_api_key: Option<String>,
    pub suggestion_model: String,
    pub instruction_model: String,
    pub payment_delay: Duration,
    /// Origin of the browser UI allowed by CORS.
    pub ui_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let data_dir = var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        let ui_origin = var("UI_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- API Keys (optional here, required by the server binary) ---
        let openai_api_key = var("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());

        // --- Adapter-specific Settings ---
        let suggestion_model =
            var("SUGGESTION_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let instruction_model =
            var("INSTRUCTION_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());

        let payment_delay = match var("PAYMENT_DELAY_MS") {
            Some(ms) => ms.trim().parse::<u64>().map(Duration::from_millis).map_err(|e| {
                ConfigError::InvalidValue("PAYMENT_DELAY_MS".to_string(), e.to_string())
            })?,
            None => Duration::from_millis(1500),
        };

        Ok(Self {
            bind_address,
            log_level,
            data_dir,
            openai_api_key,
            suggestion_model,
            instruction_model,
            payment_delay,
            ui_origin,
        })
    }

    /// The OpenAI key, which the server cannot start without.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))
    }
}
