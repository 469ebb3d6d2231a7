//! Configuration management with environment variable support.
//!
//! `.env` files are loaded with `dotenvy`; typed configuration is read with
//! `envy`, field names mapping to SCREAMING_SNAKE_CASE variables.
//!
//! # Example
//!
//! ```ignore
//! use tessera_core::config::{load_dotenv, Config};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct AppConfig {
//!     secret_key: String,  // Reads from TESSERA_SECRET_KEY
//! }
//!
//! load_dotenv();
//! let config = Config::<AppConfig>::from_env_prefixed("TESSERA")?;
//! ```

use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;

/// Name of the variable that selects the [`Environment`]
pub const ENV_VAR: &str = "TESSERA_ENV";

/// Error type for configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    #[error("Configuration error: {0}")]
    Envy(#[from] envy::Error),
    /// A value was present but unusable.
    #[error("Invalid configuration value for {name}: {reason}")]
    Invalid {
        /// Variable or field name
        name: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Environment profile for the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Development environment with debug logging.
    Development,
    /// Production environment: secure cookies, info logging.
    Production,
    /// Custom environment name for specialized deployments.
    Custom(String),
}

impl Environment {
    /// Detect the current environment from `TESSERA_ENV`.
    ///
    /// "production"/"prod" and "development"/"dev" are recognised; an unset
    /// variable means development.
    pub fn current() -> Self {
        Self::parse(std::env::var(ENV_VAR).ok().as_deref())
    }

    /// Interpret a raw `TESSERA_ENV` value
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("production") | Some("prod") => Self::Production,
            Some("development") | Some("dev") | None => Self::Development,
            Some(other) => Self::Custom(other.to_string()),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Get the environment name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Get the default log level for this environment.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Production | Self::Custom(_) => "info",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed configuration deserialized from environment variables.
#[derive(Debug, Clone)]
pub struct Config<T>(pub T);

impl<T: DeserializeOwned> Config<T> {
    /// Load configuration from variables starting with `{prefix}_`.
    pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
        Ok(Config(envy::prefixed(format!("{}_", prefix)).from_env::<T>()?))
    }

    /// Load prefixed configuration from explicit key/value pairs.
    pub fn from_iter_prefixed<I>(prefix: &str, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(Config(
            envy::prefixed(format!("{}_", prefix)).from_iter::<_, T>(vars)?,
        ))
    }

    /// Get the inner configuration value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Load environment variables from a `.env` file in the current directory.
///
/// Missing files are ignored and existing variables are not overridden.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}
