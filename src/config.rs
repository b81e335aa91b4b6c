// Configuration management

use crate::auth::api_key::ApiKey;
use crate::core::errors::CrewError;
use std::env;
use std::path::PathBuf;

/// Name of the per-user data directory under `$HOME`
pub const CREW_DIR_NAME: &str = ".crew";

/// File name of the server's SQLite database inside the data directory
pub const DATABASE_FILE_NAME: &str = "crew.db";

/// Server configuration loaded from environment variables
///
/// The shared API key is kept as an [`ApiKey`] so it never shows up in
/// `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Shared secret for protected routes
    pub api_key: ApiKey,

    // Storage
    pub data_dir: PathBuf,
    pub database_path: PathBuf,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    /// An unset or empty `CREW_API_KEY` is accepted; the server then rejects
    /// every protected request.
    pub fn from_env() -> Result<Self, CrewError> {
        // Skip in test environment to avoid interfering with test environment variables
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok(); // Ignore errors (file may not exist)
        }

        let data_dir = match Self::get_optional_env("CREW_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => default_crew_dir()?,
        };
        let database_path = Self::get_optional_env("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DATABASE_FILE_NAME));

        let config = Self {
            bind_address: Self::get_env_or_default("BIND_ADDRESS", "0.0.0.0"),
            port: Self::parse_port()?,
            api_key: ApiKey::new(&Self::get_env_or_default("CREW_API_KEY", "")),
            data_dir,
            database_path,
            request_timeout_secs: Self::parse_u64_or_default("REQUEST_TIMEOUT_SECS", 30)?,
            body_size_limit_bytes: Self::parse_usize_or_default("BODY_SIZE_LIMIT_BYTES", 64 * 1024)?,
            log_level: Self::get_env_or_default("LOG_LEVEL", "info"),
            log_format: Self::get_env_or_default("LOG_FORMAT", "text"),
        };

        config.validate()?;

        Ok(config)
    }

    /// Get environment variable or return default value
    fn get_env_or_default(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get optional environment variable, treating empty as unset
    fn get_optional_env(key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    /// Parse port from PORT environment variable
    fn parse_port() -> Result<u16, CrewError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port = port_str.parse::<u16>().map_err(|e| {
            CrewError::ConfigurationError(format!("Invalid PORT value '{}': {}", port_str, e))
        })?;

        if port == 0 {
            return Err(CrewError::ConfigurationError(
                "PORT must be between 1 and 65535".to_string(),
            ));
        }

        Ok(port)
    }

    /// Parse u64 from environment variable or return default
    fn parse_u64_or_default(key: &str, default: u64) -> Result<u64, CrewError> {
        match env::var(key) {
            Ok(value) => Self::parse_positive(key, &value),
            _ => Ok(default),
        }
    }

    /// Parse usize from environment variable or return default
    fn parse_usize_or_default(key: &str, default: usize) -> Result<usize, CrewError> {
        match env::var(key) {
            Ok(value) => Self::parse_positive(key, &value),
            _ => Ok(default),
        }
    }

    /// Parse a strictly positive integer
    fn parse_positive<T>(key: &str, value: &str) -> Result<T, CrewError>
    where
        T: std::str::FromStr + PartialEq + Default,
        T::Err: std::fmt::Display,
    {
        let parsed = value.parse::<T>().map_err(|e| {
            CrewError::ConfigurationError(format!("Invalid {} value '{}': {}", key, value, e))
        })?;

        if parsed == T::default() {
            return Err(CrewError::ConfigurationError(format!(
                "{} must be greater than 0",
                key
            )));
        }

        Ok(parsed)
    }

    /// Validate all configuration values
    fn validate(&self) -> Result<(), CrewError> {
        Self::validate_log_level(&self.log_level)?;
        Self::validate_log_format(&self.log_format)?;
        Ok(())
    }

    /// Validate log level
    fn validate_log_level(level: &str) -> Result<(), CrewError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&level.to_lowercase().as_str()) {
            return Err(CrewError::ConfigurationError(format!(
                "Invalid LOG_LEVEL '{}': must be one of {}",
                level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    /// Validate log format
    fn validate_log_format(format: &str) -> Result<(), CrewError> {
        if format != "json" && format != "text" {
            return Err(CrewError::ConfigurationError(format!(
                "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
                format
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Create a test configuration for unit tests
    ///
    /// This bypasses environment variable loading for use in tests that
    /// don't need real configuration.
    pub fn test_config(api_key: &str) -> Self {
        let data_dir = env::temp_dir().join("crew-test");
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            api_key: ApiKey::new(api_key),
            database_path: data_dir.join(DATABASE_FILE_NAME),
            data_dir,
            request_timeout_secs: 30,
            body_size_limit_bytes: 64 * 1024,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

/// `$HOME/.crew`
pub fn default_crew_dir() -> Result<PathBuf, CrewError> {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(CREW_DIR_NAME))
        .ok_or_else(|| {
            CrewError::ConfigurationError(
                "Could not find home directory; set CREW_HOME".to_string(),
            )
        })
}

/// Data directory: `$CREW_HOME` if set, else `$HOME/.crew`
pub fn crew_dir() -> Result<PathBuf, CrewError> {
    match Config::get_optional_env("CREW_HOME") {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => default_crew_dir(),
    }
}
