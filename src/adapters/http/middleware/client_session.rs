//! Client session middleware and extractor.
//!
//! Browsers identify themselves with the `x-client-session` header. A missing,
//! malformed or unknown id gets a transient session that lives for one
//! request. Handlers that must keep state across requests extract
//! [`StoredSession`], which registers the session. The id is echoed back in
//! the same header only for registered sessions.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::adapters::http::error::ApiError;
use crate::application::{ClientSession, ClientSessionRegistry};
use crate::domain::foundation::{ClientSessionId, ErrorCode};

/// Request and response header carrying the client session id.
pub const CLIENT_SESSION_HEADER: &str = "x-client-session";

/// The client session resolved for this request.
#[derive(Clone)]
pub struct CurrentSession(pub Arc<ClientSession>);

/// The client session for this request, stored in the registry.
///
/// Rejects with 503 when the registry is full.
#[derive(Clone)]
pub struct StoredSession(pub Arc<ClientSession>);

/// Resolves the client session and makes it available to handlers.
pub async fn client_session_middleware(
    State(registry): State<Arc<ClientSessionRegistry>>,
    mut request: Request,
    next: Next,
) -> Response {
    let requested = request
        .headers()
        .get(CLIENT_SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<ClientSessionId>().ok());

    let session = registry.resolve(requested).await;
    request
        .extensions_mut()
        .insert(CurrentSession(Arc::clone(&session)));
    request.extensions_mut().insert(registry);

    let mut response = next.run(request).await;
    if session.is_registered() {
        if let Ok(value) = HeaderValue::from_str(&session.id().to_string()) {
            response.headers_mut().insert(CLIENT_SESSION_HEADER, value);
        }
    }
    response
}

fn middleware_missing() -> ApiError {
    tracing::error!("client session middleware not installed on this route");
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::InternalError,
        "Session unavailable",
    )
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or_else(middleware_missing)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for StoredSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        let registry = parts
            .extensions
            .get::<Arc<ClientSessionRegistry>>()
            .cloned()
            .ok_or_else(middleware_missing)?;

        registry.register(&session).await.map_err(|_| {
            ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::SessionCapacity,
                "Too many active sessions. Please try again later.",
            )
        })?;
        Ok(StoredSession(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::adapters::store::InMemoryDocumentStore;
    use crate::application::{SessionServices, DEFAULT_SESSION_TTL};
    use axum::{
        body::Body,
        middleware,
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt;

    fn app(registry: Arc<ClientSessionRegistry>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|CurrentSession(session): CurrentSession| async move { session.id().to_string() }),
            )
            .route(
                "/keep",
                post(|StoredSession(session): StoredSession| async move { session.id().to_string() }),
            )
            .layer(middleware::from_fn_with_state(registry, client_session_middleware))
    }

    fn registry() -> Arc<ClientSessionRegistry> {
        Arc::new(ClientSessionRegistry::new(
            SessionServices {
                identity: Arc::new(MockIdentityProvider::new()),
                store: Arc::new(InMemoryDocumentStore::new()),
            },
            DEFAULT_SESSION_TTL,
        ))
    }

    fn request(method: &str, uri: &str, session: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some(session) = session {
            builder = builder.header(CLIENT_SESSION_HEADER, session);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn echoed(response: &Response) -> Option<String> {
        response
            .headers()
            .get(CLIENT_SESSION_HEADER)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn reads_without_a_header_store_nothing() {
        let registry = registry();
        for _ in 0..20 {
            let response = app(registry.clone())
                .oneshot(request("GET", "/whoami", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(echoed(&response), None);
        }
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn stored_session_is_registered_and_echoed() {
        let registry = registry();
        let response = app(registry.clone())
            .oneshot(request("POST", "/keep", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let id: ClientSessionId = echoed(&response).unwrap().parse().unwrap();
        assert!(registry.get(&id).await.is_some());
    }

    #[tokio::test]
    async fn reuses_a_known_session() {
        let registry = registry();
        let existing = registry.resolve(None).await;
        registry.register(&existing).await.unwrap();

        let response = app(registry.clone())
            .oneshot(request("GET", "/whoami", Some(&existing.id().to_string())))
            .await
            .unwrap();

        assert_eq!(echoed(&response), Some(existing.id().to_string()));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn malformed_header_gets_a_fresh_session_on_write() {
        let response = app(registry())
            .oneshot(request("POST", "/keep", Some("not-a-uuid")))
            .await
            .unwrap();

        assert!(echoed(&response).unwrap().parse::<ClientSessionId>().is_ok());
    }

    #[tokio::test]
    async fn full_registry_rejects_writes_with_503() {
        let registry = Arc::new(
            ClientSessionRegistry::new(
                SessionServices {
                    identity: Arc::new(MockIdentityProvider::new()),
                    store: Arc::new(InMemoryDocumentStore::new()),
                },
                DEFAULT_SESSION_TTL,
            )
            .with_max_sessions(1),
        );

        let first = app(registry.clone())
            .oneshot(request("POST", "/keep", None))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app(registry.clone())
            .oneshot(request("POST", "/keep", None))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(echoed(&second), None);
        assert_eq!(registry.len().await, 1);
    }
}
