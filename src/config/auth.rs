//! Identity provider configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::auth::DEFAULT_IDENTITY_TOOLKIT_URL;

/// Anonymous identity configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub provider: IdentityBackend,

    /// Web API key of the Firebase project
    pub firebase_api_key: Option<String>,

    #[serde(default = "default_identity_toolkit_url")]
    pub identity_toolkit_url: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentityBackend {
    #[default]
    Firebase,
    /// Mints local ids, for development
    Mock,
}

impl AuthConfig {
    /// In production, requires HTTPS for the Identity Toolkit URL.
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        match self.provider {
            IdentityBackend::Firebase => {
                if self.firebase_api_key.as_ref().map_or(true, |k| k.is_empty()) {
                    return Err(ValidationError::MissingRequired("FIREBASE_API_KEY"));
                }
                if production && !self.identity_toolkit_url.starts_with("https://") {
                    return Err(ValidationError::IdentityUrlMustBeHttps);
                }
            }
            IdentityBackend::Mock if production => {
                return Err(ValidationError::MockInProduction("auth"));
            }
            IdentityBackend::Mock => {}
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider: IdentityBackend::default(),
            firebase_api_key: None,
            identity_toolkit_url: default_identity_toolkit_url(),
        }
    }
}

fn default_identity_toolkit_url() -> String {
    DEFAULT_IDENTITY_TOOLKIT_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firebase_requires_api_key() {
        let config = AuthConfig::default();
        assert!(matches!(
            config.validate(false),
            Err(ValidationError::MissingRequired("FIREBASE_API_KEY"))
        ));
    }

    #[test]
    fn test_production_requires_https() {
        let config = AuthConfig {
            firebase_api_key: Some("AIza-test".to_string()),
            identity_toolkit_url: "http://localhost:9099/identitytoolkit.googleapis.com".to_string(),
            ..Default::default()
        };
        // Emulator is fine locally
        assert!(config.validate(false).is_ok());
        assert!(config.validate(true).is_err());
    }

    #[test]
    fn test_mock_backend_rejected_in_production() {
        let config = AuthConfig {
            provider: IdentityBackend::Mock,
            ..Default::default()
        };
        assert!(config.validate(false).is_ok());
        assert!(config.validate(true).is_err());
    }
}
