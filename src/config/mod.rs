//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SAFE_HAVEN` prefix and nested values use double underscores as separators.
//!
//! With no variables set the service starts in development mode backed by
//! in-memory adapters, except that OpenAI and Firebase are the default
//! providers and need their keys.
//!
//! # Example
//!
//! ```no_run
//! use safe_haven::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod auth;
mod error;
mod rate_limit;
mod server;
mod store;

pub use ai::{AiConfig, AiProvider};
pub use auth::{AuthConfig, IdentityBackend};
pub use error::{ConfigError, ValidationError};
pub use rate_limit::{RateLimitBackend, RateLimitSettings};
pub use server::{Environment, ServerConfig};
pub use store::{StoreBackend, StoreConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, environment, logging, sessions)
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion provider (OpenAI/Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Anonymous identity provider (Firebase)
    #[serde(default)]
    pub auth: AuthConfig,

    /// Document store (PostgreSQL or in-memory)
    #[serde(default)]
    pub store: StoreConfig,

    /// Assistant quotas (Redis or in-memory)
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SAFE_HAVEN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SAFE_HAVEN__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SAFE_HAVEN__STORE__DATABASE_URL=...` -> `store.database_url = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SAFE_HAVEN")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Production additionally rejects development backends and plain-HTTP
    /// identity endpoints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let production = self.is_production();
        self.server.validate()?;
        self.ai.validate(production)?;
        self.auth.validate(production)?;
        self.store.validate(production)?;
        self.rate_limit.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
