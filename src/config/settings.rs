//! Service settings.
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional `config.toml` (path overridable with `CONFIG_PATH`), and the
//! `HOST`, `PORT`, `DATABASE_URL` and `APP_ENV` environment variables.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Runtime environment; development mode exposes error diagnostics to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(Error::Config {
                message: format!("Unknown environment '{other}'"),
            }),
        }
    }
}

/// Top-level service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Interface to bind
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub environment: Environment,
    /// Page size used when a list request does not name one
    pub default_page_size: u64,
    /// Larger requested page sizes are clamped to this value
    pub max_page_size: u64,
    /// Balance given to a user the first time their credits are read
    pub starting_credits: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9002,
            database_url: "sqlite://printshop.sqlite?mode=rwc".to_string(),
            environment: Environment::Production,
            default_page_size: 10,
            max_page_size: 100,
            starting_credits: 2,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config.toml: {e}"),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from `path` if it exists, otherwise starts from the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Overrides fields from the process environment.
    pub fn apply_env(mut self) -> Result<Self> {
        if let Ok(host) = std::env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.port = port.parse().map_err(|e| Error::Config {
                message: format!("Invalid PORT '{port}': {e}"),
            })?;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Ok(env) = std::env::var("APP_ENV") {
            self.environment = env.parse()?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Whether error responses may include raw diagnostics.
    pub fn expose_error_details(&self) -> bool {
        self.environment == Environment::Development
    }

    fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(Error::Config {
                message: "Page sizes must be positive".to_string(),
            });
        }
        if self.default_page_size > self.max_page_size {
            return Err(Error::Config {
                message: "default_page_size cannot exceed max_page_size".to_string(),
            });
        }
        if self.starting_credits < 0 {
            return Err(Error::Config {
                message: "starting_credits cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads the service settings: config file, then environment overrides.
pub fn load_settings() -> Result<Settings> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let settings = Settings::from_file(&path)?.apply_env()?;
    info!(
        "Settings loaded: {}:{} ({:?})",
        settings.host, settings.port, settings.environment
    );
    Ok(settings)
}
