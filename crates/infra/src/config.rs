//! Configuration loading and representation.
//!
//! Everything comes from environment variables:
//!
//! | variable | default |
//! |---|---|
//! | `STOCKROOM_BIND_ADDR` | `0.0.0.0:8080` |
//! | `DATABASE_URL` | unset → in-memory store |
//! | `STOCKROOM_LOG_FORMAT` | `json` |
//!
//! Log filtering itself is driven by `RUST_LOG` in `stockroom-observability`.

use std::net::SocketAddr;

use thiserror::Error;

use stockroom_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("unsupported DATABASE_URL scheme (expected sqlite:): {0}")]
    UnsupportedDatabase(String),
}

/// Which entity store backs the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// Process-local, lost on restart (dev/test).
    InMemory,
    Sqlite { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup("STOCKROOM_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            var: "STOCKROOM_BIND_ADDR",
            reason: e.to_string(),
        })?;

        let database = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            None => DatabaseConfig::InMemory,
            Some(url) if url.starts_with("sqlite:") => DatabaseConfig::Sqlite { url },
            Some(url) => return Err(ConfigError::UnsupportedDatabase(url)),
        };

        let log_format = match lookup("STOCKROOM_LOG_FORMAT") {
            None => LogFormat::default(),
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| ConfigError::Invalid {
                var: "STOCKROOM_LOG_FORMAT",
                reason: e.to_string(),
            })?,
        };

        Ok(Self {
            bind_addr,
            database,
            log_format,
        })
    }
}
