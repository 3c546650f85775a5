//! Firebase Identity Toolkit adapter for anonymous sign-in.
//!
//! Anonymous accounts are created with a bare `accounts:signUp` call:
//!
//! ```text
//! POST {base_url}/v1/accounts:signUp?key={api_key}
//! {"returnSecureToken": true}
//! ```
//!
//! The returned `localId` becomes the identity id. Tokens in the response are
//! not kept; the service writes on the identity's behalf.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::{Identity, IdentityError, IdentityId};
use crate::ports::IdentityProvider;

/// Production Identity Toolkit endpoint.
pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

/// Configuration for the Firebase identity adapter.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    api_key: Secret<String>,
    /// Identity Toolkit base URL; point at the auth emulator in development.
    pub base_url: String,
    pub timeout: Duration,
}

impl FirebaseConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: DEFAULT_IDENTITY_TOOLKIT_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn sign_up_url(&self) -> String {
        format!(
            "{}/v1/accounts:signUp?key={}",
            self.base_url.trim_end_matches('/'),
            self.api_key.expose_secret()
        )
    }
}

/// Identity provider backed by Firebase anonymous auth.
pub struct FirebaseIdentityProvider {
    config: FirebaseConfig,
    client: Client,
}

impl FirebaseIdentityProvider {
    pub fn new(config: FirebaseConfig) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IdentityError::unavailable(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Maps a non-success response to an identity error.
    fn map_error_status(status: StatusCode, body: &str) -> IdentityError {
        let message = serde_json::from_str::<FirebaseErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status.as_u16() {
            400 if message.starts_with("OPERATION_NOT_ALLOWED")
                || message.starts_with("ADMIN_ONLY_OPERATION") =>
            {
                IdentityError::ProviderDisabled
            }
            429 | 500..=599 => IdentityError::unavailable(format!("{}: {}", status, message)),
            _ => IdentityError::InvalidResponse(format!("{}: {}", status, message)),
        }
    }

    fn into_identity(body: SignUpResponse) -> Result<Identity, IdentityError> {
        let id = IdentityId::new(body.local_id)
            .map_err(|_| IdentityError::InvalidResponse("empty localId".to_string()))?;
        Ok(Identity::anonymous(id))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn create_anonymous_identity(&self) -> Result<Identity, IdentityError> {
        let response = self
            .client
            .post(self.config.sign_up_url())
            .json(&SignUpRequest {
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Identity Toolkit request failed");
                IdentityError::unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = Self::map_error_status(status, &body);
            tracing::warn!(status = %status, error = %error, "Anonymous sign-up rejected");
            return Err(error);
        }

        let body: SignUpResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;
        let identity = Self::into_identity(body)?;
        tracing::info!(identity_id = %identity.id, "Anonymous identity created");
        Ok(identity)
    }
}

// ----- Identity Toolkit API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest {
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorBody {
    error: FirebaseErrorDetail,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_url_includes_key() {
        let config = FirebaseConfig::new("abc").with_base_url("http://localhost:9099/identitytoolkit.googleapis.com/");
        assert_eq!(
            config.sign_up_url(),
            "http://localhost:9099/identitytoolkit.googleapis.com/v1/accounts:signUp?key=abc"
        );
    }

    #[test]
    fn request_body_is_camel_case() {
        let body = serde_json::to_value(SignUpRequest {
            return_secure_token: true,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"returnSecureToken": true}));
    }

    #[test]
    fn local_id_becomes_anonymous_identity() {
        let body: SignUpResponse = serde_json::from_str(
            r#"{"kind":"identitytoolkit#SignupNewUserResponse","idToken":"t","localId":"kXq9Zt2a","expiresIn":"3600"}"#,
        )
        .unwrap();

        let identity = FirebaseIdentityProvider::into_identity(body).unwrap();

        assert_eq!(identity.id.as_str(), "kXq9Zt2a");
        assert!(identity.is_anonymous);
    }

    #[test]
    fn blank_local_id_is_invalid() {
        let body = SignUpResponse {
            local_id: " ".to_string(),
        };
        assert!(matches!(
            FirebaseIdentityProvider::into_identity(body),
            Err(IdentityError::InvalidResponse(_))
        ));
    }

    #[test]
    fn operation_not_allowed_means_disabled() {
        let body = r#"{"error":{"code":400,"message":"OPERATION_NOT_ALLOWED : Anonymous user sign-in is disabled for this project."}}"#;
        assert_eq!(
            FirebaseIdentityProvider::map_error_status(StatusCode::BAD_REQUEST, body),
            IdentityError::ProviderDisabled
        );
    }

    #[test]
    fn admin_only_means_disabled() {
        let body = r#"{"error":{"code":400,"message":"ADMIN_ONLY_OPERATION"}}"#;
        assert_eq!(
            FirebaseIdentityProvider::map_error_status(StatusCode::BAD_REQUEST, body),
            IdentityError::ProviderDisabled
        );
    }

    #[test]
    fn server_errors_are_transient() {
        let error =
            FirebaseIdentityProvider::map_error_status(StatusCode::SERVICE_UNAVAILABLE, "oops");
        assert!(error.is_transient());
    }

    #[test]
    fn other_client_errors_are_invalid_responses() {
        let body = r#"{"error":{"code":400,"message":"API_KEY_INVALID"}}"#;
        assert!(matches!(
            FirebaseIdentityProvider::map_error_status(StatusCode::BAD_REQUEST, body),
            IdentityError::InvalidResponse(m) if m.contains("API_KEY_INVALID")
        ));
    }
}
