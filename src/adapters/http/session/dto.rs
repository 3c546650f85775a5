//! HTTP DTOs for the client session endpoint.

use serde::Serialize;

use crate::application::ClientSession;
use crate::domain::foundation::Identity;
use crate::domain::submission::SubmissionStatus;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub id: String,
    pub is_anonymous: bool,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            is_anonymous: identity.is_anonymous,
        }
    }
}

/// Snapshot of one browser session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateResponse {
    /// `null` while the session is not stored.
    pub client_session: Option<String>,
    /// `null` until the first successful submission.
    pub identity: Option<IdentityResponse>,
    pub report_status: SubmissionStatus,
    pub post_status: SubmissionStatus,
}

impl From<&ClientSession> for SessionStateResponse {
    fn from(session: &ClientSession) -> Self {
        Self {
            client_session: session
                .is_registered()
                .then(|| session.id().to_string()),
            identity: session.gate().current().map(IdentityResponse::from),
            report_status: session.reports().status(),
            post_status: session.posts().status(),
        }
    }
}
