//! Rate limiting middleware for the assistant endpoints.
//!
//! Every completion costs money, so each assistant call is counted against
//! two fixed windows: the client IP and the client session. Either one being
//! exhausted yields 429 with `Retry-After`. A failing limiter lets requests
//! through.
//!
//! The client IP is the socket peer. Forwarding headers are honoured only
//! when the peer is a configured trusted proxy. A client without a stored
//! session is charged the session quota against its IP.
//!
//! Allowed responses carry the session-scope status in:
//! - `X-RateLimit-Limit`
//! - `X-RateLimit-Remaining`
//! - `X-RateLimit-Reset` (Unix seconds)
//!
//! # Example
//!
//! ```ignore
//! let limiter = RateLimiterState::new(Arc::new(InMemoryRateLimiter::with_defaults()))
//!     .with_trusted_proxies(["10.0.0.2".parse()?]);
//!
//! let routes = Router::new()
//!     .route("/chat", post(chat))
//!     .route_layer(middleware::from_fn_with_state(limiter, assistant_rate_limit));
//! ```

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::client_session::CurrentSession;
use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::ErrorCode;
use crate::ports::{RateLimitDenied, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter};

/// Rate limiter middleware state.
#[derive(Clone)]
pub struct RateLimiterState {
    limiter: Arc<dyn RateLimiter>,
    trusted_proxies: Arc<[IpAddr]>,
}

impl RateLimiterState {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            trusted_proxies: Arc::from(Vec::<IpAddr>::new()),
        }
    }

    /// Peers whose forwarding headers are believed.
    pub fn with_trusted_proxies(mut self, proxies: impl IntoIterator<Item = IpAddr>) -> Self {
        self.trusted_proxies = proxies.into_iter().collect();
        self
    }
}

/// Quota name shared by all assistant tools.
pub const ASSISTANT_RESOURCE: &str = "assistant";

/// Identifier used when no peer address is known.
const UNKNOWN_CLIENT: &str = "unknown";

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Checks the IP quota, then the client-session quota.
pub async fn assistant_rate_limit(
    State(state): State<RateLimiterState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr.ip());
    let ip = client_ip(request.headers(), peer, &state.trusted_proxies)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    let session_key = match request.extensions().get::<CurrentSession>() {
        Some(CurrentSession(session)) if session.is_registered() => {
            RateLimitKey::client_session(&session.id(), ASSISTANT_RESOURCE)
        }
        _ => RateLimitKey::unregistered_session(&ip, ASSISTANT_RESOURCE),
    };
    let keys = [RateLimitKey::ip(&ip, ASSISTANT_RESOURCE), session_key];

    let mut last_status = None;
    for key in keys {
        match state.limiter.check(key.clone()).await {
            Ok(RateLimitResult::Allowed(status)) => last_status = Some(status),
            Ok(RateLimitResult::Denied(denied)) => {
                tracing::info!(scope = %denied.scope, retry_after = denied.retry_after_secs, "Assistant rate limit hit");
                return rate_limit_response(&denied);
            }
            Err(e) => {
                // Fail open
                tracing::warn!(scope = %key.scope, error = %e, "Rate limiter unavailable");
            }
        }
    }

    let mut response = next.run(request).await;
    if let Some(status) = last_status {
        add_rate_limit_headers(&mut response, &status);
    }
    response
}

/// Client IP for quota purposes.
///
/// Without a trusted peer, the peer address is the answer and forwarding
/// headers are ignored. Behind a trusted proxy, X-Forwarded-For is read
/// right to left and the first untrusted hop wins; X-Real-IP is the fallback.
fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>, trusted: &[IpAddr]) -> Option<IpAddr> {
    let peer = peer?;
    if !trusted.contains(&peer) {
        return Some(peer);
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    if let Some(forwarded) = header("X-Forwarded-For") {
        let hops: Vec<IpAddr> = forwarded
            .split(',')
            .filter_map(|hop| hop.trim().parse().ok())
            .collect();
        if let Some(client) = hops.iter().rev().find(|hop| !trusted.contains(hop)) {
            return Some(*client);
        }
    }
    if let Some(real_ip) = header("X-Real-IP").and_then(|v| v.parse::<IpAddr>().ok()) {
        return Some(real_ip);
    }
    Some(peer)
}

fn rate_limit_response(denied: &RateLimitDenied) -> Response {
    let body = ErrorResponse::with_details(
        ErrorCode::RateLimited,
        "Too many requests. Please wait a moment and try again.",
        serde_json::json!({ "retry_after_secs": denied.retry_after_secs }),
    );
    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    let headers = response.headers_mut();
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(denied.limit));
    headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(0u32));
    headers.insert(RETRY_AFTER, HeaderValue::from(denied.retry_after_secs));
    response
}

fn add_rate_limit_headers(response: &mut Response, status: &RateLimitStatus) {
    let headers = response.headers_mut();
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(status.limit));
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from(status.remaining),
    );
    headers.insert(
        headers::X_RATELIMIT_RESET.clone(),
        HeaderValue::from(status.reset_at.as_unix_secs()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
    use crate::adapters::store::InMemoryDocumentStore;
    use crate::application::{ClientSessionRegistry, SessionServices, DEFAULT_SESSION_TTL};
    use crate::ports::RateLimitError;
    use async_trait::async_trait;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    struct BrokenLimiter;

    #[async_trait]
    impl RateLimiter for BrokenLimiter {
        async fn check(&self, _key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
            Err(RateLimitError::Unavailable("redis down".to_string()))
        }
    }

    const PROXY: &str = "10.0.0.2";

    fn state(ip_limit: u32, session_limit: u32) -> RateLimiterState {
        RateLimiterState::new(Arc::new(InMemoryRateLimiter::new(RateLimitConfig::per_minute(
            ip_limit,
            session_limit,
        ))))
        .with_trusted_proxies([PROXY.parse().unwrap()])
    }

    fn app(limiter: RateLimiterState) -> Router {
        Router::new()
            .route("/chat", get(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(limiter, assistant_rate_limit))
    }

    fn request_from(peer: &str) -> axum::http::Request<Body> {
        let mut request = axum::http::Request::builder()
            .uri("/chat")
            .body(Body::empty())
            .unwrap();
        let addr = SocketAddr::new(peer.parse().unwrap(), 40000);
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    fn forwarded(peer: &str, forwarded_for: &str) -> axum::http::Request<Body> {
        let mut request = request_from(peer);
        request
            .headers_mut()
            .insert("x-forwarded-for", HeaderValue::from_str(forwarded_for).unwrap());
        request
    }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    // ─── IP Extraction ───────────────────────────────────────────────

    #[test]
    fn untrusted_peer_ignores_forwarding_headers() {
        let map = headers(&[("x-forwarded-for", "1.2.3.4"), ("x-real-ip", "9.8.7.6")]);
        assert_eq!(client_ip(&map, Some(ip("5.5.5.5")), &[ip(PROXY)]), Some(ip("5.5.5.5")));
    }

    #[test]
    fn trusted_proxy_uses_rightmost_untrusted_hop() {
        let map = headers(&[("x-forwarded-for", "6.6.6.6, 1.2.3.4, 10.0.0.3")]);
        let trusted = [ip(PROXY), ip("10.0.0.3")];
        assert_eq!(client_ip(&map, Some(ip(PROXY)), &trusted), Some(ip("1.2.3.4")));
    }

    #[test]
    fn trusted_proxy_falls_back_to_x_real_ip() {
        let map = headers(&[("x-real-ip", "9.8.7.6")]);
        assert_eq!(client_ip(&map, Some(ip(PROXY)), &[ip(PROXY)]), Some(ip("9.8.7.6")));
    }

    #[test]
    fn no_peer_means_no_ip() {
        let map = headers(&[("x-forwarded-for", "1.2.3.4")]);
        assert_eq!(client_ip(&map, None, &[]), None);
    }

    // ─── Middleware ──────────────────────────────────────────────────

    #[tokio::test]
    async fn allowed_requests_carry_quota_headers() {
        let response = app(state(5, 5)).oneshot(request_from("1.1.1.1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "5");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "4");
    }

    #[tokio::test]
    async fn exhausted_ip_quota_returns_429_with_retry_after() {
        let limiter = state(1, 10);

        let first = app(limiter.clone()).oneshot(request_from("2.2.2.2")).await.unwrap();
        let second = app(limiter).oneshot(request_from("2.2.2.2")).await.unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key(RETRY_AFTER));
    }

    #[tokio::test]
    async fn spoofed_forwarded_for_does_not_reset_the_ip_quota() {
        let limiter = state(1, 10);

        let first = app(limiter.clone())
            .oneshot(forwarded("4.4.4.4", "100.0.0.1"))
            .await
            .unwrap();
        let second = app(limiter)
            .oneshot(forwarded("4.4.4.4", "100.0.0.2"))
            .await
            .unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn clients_behind_a_trusted_proxy_have_separate_quotas() {
        let limiter = state(1, 10);

        let first = app(limiter.clone())
            .oneshot(forwarded(PROXY, "100.0.0.1"))
            .await
            .unwrap();
        let second = app(limiter)
            .oneshot(forwarded(PROXY, "100.0.0.2"))
            .await
            .unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn fresh_transient_sessions_share_the_ip_session_quota() {
        let registry = ClientSessionRegistry::new(
            SessionServices {
                identity: Arc::new(MockIdentityProvider::new()),
                store: Arc::new(InMemoryDocumentStore::new()),
            },
            DEFAULT_SESSION_TTL,
        );
        let limiter = state(100, 1);

        let mut statuses = Vec::new();
        for _ in 0..2 {
            let mut request = request_from("7.7.7.7");
            let session = registry.resolve(None).await;
            request.extensions_mut().insert(CurrentSession(session));
            statuses.push(app(limiter.clone()).oneshot(request).await.unwrap().status());
        }

        assert_eq!(statuses, vec![StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]);
    }

    #[tokio::test]
    async fn limiter_failure_fails_open() {
        let response = app(RateLimiterState::new(Arc::new(BrokenLimiter)))
            .oneshot(request_from("3.3.3.3"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
