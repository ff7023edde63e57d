use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_LOG_FILTER: &str = "dekost_be=debug,tower_http=debug";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("APP_PORT tidak valid: '{0}'")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Built frontend to serve for every non-API path.
    pub frontend_dir: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment, loading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3000,
        };

        let frontend_dir = lookup("FRONTEND_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            frontend_dir,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
