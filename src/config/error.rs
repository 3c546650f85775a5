//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind host: {0}")]
    InvalidHost(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid timeout")]
    InvalidTimeout,

    #[error("Session TTL must be at least 60 seconds")]
    InvalidSessionTtl,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool max_connections must be positive")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Rate limits must be positive")]
    InvalidRateLimit,

    #[error("Invalid trusted proxy address: {0}")]
    InvalidTrustedProxy(String),

    #[error("Max sessions must be positive")]
    InvalidMaxSessions,

    #[error("Identity Toolkit URL must use HTTPS in production")]
    IdentityUrlMustBeHttps,

    #[error("Development backend for {0} is not allowed in production")]
    MockInProduction(&'static str),
}
