//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which implementation backs the adventure text role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextProviderKind {
    OpenAi,
    Demo,
}

/// Which implementation backs the stock-photo search role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProviderKind {
    Unsplash,
    Demo,
    Disabled,
}

/// Which implementation backs the AI image generation role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageProviderKind {
    OpenAi,
    Demo,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Postgres,
    Memory,
    Disabled,
}

impl FromStr for TextProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "demo" | "mock" => Ok(Self::Demo),
            other => Err(format!("'{}' is not a text provider (openai, demo)", other)),
        }
    }
}

impl FromStr for SearchProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unsplash" => Ok(Self::Unsplash),
            "demo" | "mock" => Ok(Self::Demo),
            "none" | "off" | "" => Ok(Self::Disabled),
            other => Err(format!(
                "'{}' is not a search provider (unsplash, demo, none)",
                other
            )),
        }
    }
}

impl FromStr for ImageProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "demo" | "mock" => Ok(Self::Demo),
            "none" | "off" | "" => Ok(Self::Disabled),
            other => Err(format!(
                "'{}' is not an image provider (openai, demo, none)",
                other
            )),
        }
    }
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            "none" | "off" | "" => Ok(Self::Disabled),
            other => Err(format!(
                "'{}' is not a cache backend (postgres, memory, none)",
                other
            )),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: Option<String>,
    pub log_level: Level,
    pub locale: String,
    pub openai_api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
    pub text_provider: TextProviderKind,
    pub search_provider: SearchProviderKind,
    pub image_provider: ImageProviderKind,
    pub cache_backend: CacheBackend,
    pub text_model: String,
    pub image_model: String,
    pub cache_expiry_interval_minutes: u64,
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

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = std::env::var("DATABASE_URL").ok();

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let locale = std::env::var("LOCALE").unwrap_or_else(|_| "es-ES".to_string());

        // --- Load API Keys (as optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let unsplash_access_key = std::env::var("UNSPLASH_ACCESS_KEY").ok();

        // --- Select Provider Implementations ---
        let text_provider = parse_var("TEXT_PROVIDER", "demo")?;
        let search_provider = parse_var("SEARCH_PROVIDER", "demo")?;
        let image_provider = parse_var("IMAGE_PROVIDER", "none")?;
        let cache_backend = parse_var("CACHE_BACKEND", "memory")?;

        let text_model = std::env::var("TEXT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let image_model = std::env::var("IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".to_string());
        let cache_expiry_interval_minutes = parse_var("CACHE_EXPIRY_INTERVAL_MINUTES", "60")?;

        let config = Self {
            bind_address,
            database_url,
            log_level,
            locale,
            openai_api_key,
            unsplash_access_key,
            text_provider,
            search_provider,
            image_provider,
            cache_backend,
            text_model,
            image_model,
            cache_expiry_interval_minutes,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every selected live provider has the credentials it needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let needs_openai = self.text_provider == TextProviderKind::OpenAi
            || self.image_provider == ImageProviderKind::OpenAi;
        if needs_openai && self.openai_api_key.is_none() {
            return Err(ConfigError::MissingVar("OPENAI_API_KEY".to_string()));
        }
        if self.search_provider == SearchProviderKind::Unsplash
            && self.unsplash_access_key.is_none()
        {
            return Err(ConfigError::MissingVar("UNSPLASH_ACCESS_KEY".to_string()));
        }
        if self.cache_backend == CacheBackend::Postgres && self.database_url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }
        if self.cache_expiry_interval_minutes == 0 {
            return Err(ConfigError::InvalidValue(
                "CACHE_EXPIRY_INTERVAL_MINUTES".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}
