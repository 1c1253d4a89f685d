//! Configuration module for the salon admin backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default capacity of each change-feed channel.
const DEFAULT_CHANGE_BUFFER: usize = 64;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API access (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Optional JSON export of bookings imported at startup
    pub bookings_seed: Option<PathBuf>,
    /// Capacity of the change-feed broadcast channel
    pub change_buffer: usize,
}

/// Invalid configuration value.
#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("SALON_API_PSK").ok().filter(|k| !k.is_empty());

        let db_path = env::var("SALON_DB_PATH")
            .unwrap_or_else(|_| "./data/salon.sqlite".to_string())
            .into();

        let bind_raw =
            env::var("SALON_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError(format!("invalid SALON_BIND_ADDR: {}", bind_raw)))?;

        let log_level = env::var("SALON_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = match env::var("SALON_LOG_FORMAT") {
            Ok(raw) => parse_log_format(&raw)?,
            Err(_) => false,
        };

        let bookings_seed = env::var("SALON_BOOKINGS_SEED")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let change_buffer = match env::var("SALON_CHANGE_BUFFER") {
            Ok(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError(format!(
                        "invalid SALON_CHANGE_BUFFER: {}",
                        raw
                    )))
                }
            },
            Err(_) => DEFAULT_CHANGE_BUFFER,
        };

        Ok(Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            log_json,
            bookings_seed,
            change_buffer,
        })
    }
}

/// `text` (default) or `json`.
fn parse_log_format(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "text" => Ok(false),
        "json" => Ok(true),
        _ => Err(ConfigError(format!("invalid SALON_LOG_FORMAT: {}", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("SALON_API_PSK");
        env::remove_var("SALON_DB_PATH");
        env::remove_var("SALON_BIND_ADDR");
        env::remove_var("SALON_LOG_LEVEL");
        env::remove_var("SALON_LOG_FORMAT");
        env::remove_var("SALON_BOOKINGS_SEED");
        env::remove_var("SALON_CHANGE_BUFFER");

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/salon.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert!(config.bookings_seed.is_none());
        assert_eq!(config.change_buffer, DEFAULT_CHANGE_BUFFER);
    }

    #[test]
    fn test_log_format() {
        assert!(!parse_log_format("text").unwrap());
        assert!(parse_log_format("JSON").unwrap());
        assert!(parse_log_format("yaml").is_err());
    }
}
